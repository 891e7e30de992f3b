// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame processing endpoint

use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use super::upload::UploadForm;
use crate::anchors::DEFAULT_LIST_LIMIT;
use crate::llm::{generate_guidance, GUIDANCE_UNAVAILABLE_TEXT};
use crate::vision::{
    annotate_detections, decode_image_bytes, detect_and_describe, encode_jpeg_data_url,
    Detection, ObjectDetector,
};

/// Form field carrying the camera frame
pub const FRAME_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessFrameResponse {
    pub status: String,
    pub guidance_text: String,
    /// Spoken audio is not produced; always empty
    pub audio_path: String,
    pub target: String,
    /// JPEG data URL with detection boxes drawn in
    pub annotated_image: String,
    pub detections: Vec<Detection>,
}

/// Result of running the detector over one uploaded frame
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub width: u32,
    pub height: u32,
    pub detections: Vec<Detection>,
    pub annotated_image: Option<String>,
}

/// Decode, detect and optionally annotate a frame off the async runtime.
///
/// Undecodable bytes map to 400, detector and encoder failures to 500.
pub async fn analyze_frame(
    detector: Arc<dyn ObjectDetector>,
    data: Bytes,
    annotate: bool,
) -> Result<FrameAnalysis, ApiError> {
    tokio::task::spawn_blocking(move || -> Result<FrameAnalysis, ApiError> {
        let (frame, info) = decode_image_bytes(&data)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid image data: {}", e)))?;
        debug!(
            "Decoded {}x{} {:?} frame ({} bytes)",
            info.width, info.height, info.format, info.size_bytes
        );

        let detections = detect_and_describe(detector.as_ref(), &frame).map_err(|e| {
            error!("Vision error: {:#}", e);
            ApiError::InternalError("Vision processing failed.".to_string())
        })?;

        let annotated_image = if annotate {
            let annotated = annotate_detections(&frame, &detections).map_err(|e| {
                error!("Frame annotation failed: {:#}", e);
                ApiError::InternalError("Could not annotate image.".to_string())
            })?;
            Some(encode_jpeg_data_url(&annotated).map_err(|e| {
                error!("Annotated frame encoding failed: {}", e);
                ApiError::InternalError("Could not encode image.".to_string())
            })?)
        } else {
            None
        };

        Ok(FrameAnalysis {
            width: info.width,
            height: info.height,
            detections,
            annotated_image,
        })
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Vision task failed: {}", e)))?
}

pub(crate) async fn require_detector(state: &AppState) -> Result<Arc<dyn ObjectDetector>, ApiError> {
    state
        .detector()
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("Object detector not loaded".to_string()))
}

/// POST /api/process_frame
///
/// Detects objects in the uploaded frame, records them on the session and
/// asks the language model where the current target is. Guidance problems
/// never fail the request.
pub async fn process_frame_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessFrameResponse>, ApiError> {
    let start = Instant::now();
    let target = state.session.read().await.target_or_default().to_string();
    let detector = require_detector(&state).await?;

    let form = UploadForm::collect(multipart).await?;
    let frame = form.file(FRAME_FIELD)?;

    let analysis = analyze_frame(detector, frame.data.clone(), true).await?;
    state
        .session
        .write()
        .await
        .update_detections(analysis.detections.clone());

    let guidance_text = match state.language_model().await {
        Some(llm) => {
            let anchors = state
                .anchors
                .list_anchors(0, DEFAULT_LIST_LIMIT)
                .unwrap_or_else(|e| {
                    warn!("Could not load anchors for guidance: {:#}", e);
                    Vec::new()
                });
            generate_guidance(llm.as_ref(), &target, &analysis.detections, &anchors).await
        }
        None => GUIDANCE_UNAVAILABLE_TEXT.to_string(),
    };

    info!(
        "Processed frame: target={}, detections={}, took {}ms",
        target,
        analysis.detections.len(),
        start.elapsed().as_millis()
    );

    Ok(Json(ProcessFrameResponse {
        status: "guiding".to_string(),
        guidance_text,
        audio_path: String::new(),
        target,
        annotated_image: analysis.annotated_image.unwrap_or_default(),
        detections: analysis.detections,
    }))
}
