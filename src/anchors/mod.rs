// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remembered object locations ("anchors")

pub mod model;
pub mod store;

pub use model::{Anchor, NewAnchor};
pub use store::{AnchorStore, SqliteAnchorStore, DEFAULT_LIST_LIMIT};
