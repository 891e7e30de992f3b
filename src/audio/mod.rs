// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Voice commands: speech-to-text and target extraction

pub mod command;
pub mod transcription;

pub use command::extract_target_object;
pub use transcription::{Transcriber, WhisperClient, WhisperConfig};
