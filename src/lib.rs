// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod anchors;
pub mod api;
pub mod audio;
pub mod cli;
pub mod config;
pub mod llm;
pub mod session;
pub mod spatial;
pub mod vision;

pub use anchors::{Anchor, AnchorStore, NewAnchor, SqliteAnchorStore};
pub use api::{create_app, start_server, ApiError, AppState};
pub use config::NodeConfig;
pub use llm::{LanguageModel, LlmClient};
pub use session::NavigationSession;
pub use spatial::{describe_direction, estimate_distance};
pub use vision::{Detection, ObjectDetector, VisionModelManager, YoloDetector};
