// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Target selection endpoints

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use super::upload::UploadForm;
use crate::audio::extract_target_object;
use crate::session::SessionError;

/// Form field carrying the recorded command
pub const AUDIO_FIELD: &str = "audio_file";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TargetResponse {
    pub status: String,
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl TargetResponse {
    fn success(target: Option<String>) -> Self {
        Self {
            status: "success".to_string(),
            target,
            transcript: None,
            message: None,
        }
    }
}

fn session_error(e: SessionError) -> ApiError {
    ApiError::ValidationError {
        field: "name".to_string(),
        message: e.to_string(),
    }
}

/// POST /api/set_target_text
pub async fn set_target_text_handler(
    State(state): State<AppState>,
    Json(request): Json<TargetRequest>,
) -> Result<Json<TargetResponse>, ApiError> {
    let mut session = state.session.write().await;
    let target = session.set_target(&request.name).map_err(session_error)?;
    Ok(Json(TargetResponse::success(Some(target.to_string()))))
}

/// GET /api/target
pub async fn get_target_handler(State(state): State<AppState>) -> Json<TargetResponse> {
    let session = state.session.read().await;
    Json(TargetResponse::success(
        session.current_target().map(str::to_string),
    ))
}

/// DELETE /api/target
pub async fn clear_target_handler(State(state): State<AppState>) -> Json<TargetResponse> {
    state.session.write().await.clear_target();
    info!("Target cleared");
    Json(TargetResponse::success(None))
}

/// POST /api/set_target_from_audio
///
/// Transcribes the uploaded clip and sets the object named in it. A clip
/// that transcribes to text without an object yields `status: "error"`
/// rather than an HTTP error.
pub async fn set_target_from_audio_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TargetResponse>, ApiError> {
    let transcriber = state.transcriber().await.ok_or_else(|| {
        ApiError::ServiceUnavailable("Voice targeting is not configured".to_string())
    })?;

    let form = UploadForm::collect(multipart).await?;
    let audio = form.file(AUDIO_FIELD)?;
    if audio.data.is_empty() {
        return Err(ApiError::ValidationError {
            field: AUDIO_FIELD.to_string(),
            message: "Audio upload is empty".to_string(),
        });
    }
    let file_name = audio
        .file_name
        .clone()
        .unwrap_or_else(|| "command.wav".to_string());

    let command = match transcriber.transcribe(audio.data.to_vec(), &file_name).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Transcription failed: {:#}", e);
            String::new()
        }
    };
    if command.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "Could not transcribe audio.".to_string(),
        ));
    }
    debug!("Voice command: {}", command);

    let Some(target) = extract_target_object(&command) else {
        return Ok(Json(TargetResponse {
            status: "error".to_string(),
            target: None,
            transcript: Some(command),
            message: Some("No target identified.".to_string()),
        }));
    };

    let mut session = state.session.write().await;
    let target = session.set_target(&target).map_err(session_error)?.to_string();

    Ok(Json(TargetResponse {
        transcript: Some(command),
        ..TargetResponse::success(Some(target))
    }))
}
