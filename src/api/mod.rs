// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod anchors;
pub mod errors;
pub mod frame;
pub mod http_server;
pub mod target;
pub mod upload;

pub use anchors::{DeleteAnchorResponse, ListAnchorsQuery, SaveAnchorResponse};
pub use errors::{ApiError, ErrorResponse};
pub use frame::{analyze_frame, FrameAnalysis, ProcessFrameResponse};
pub use http_server::{create_app, create_app_with_cors, start_server, AppState, HealthResponse};
pub use target::{TargetRequest, TargetResponse};
