// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Anchor endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::errors::ApiError;
use super::frame::{analyze_frame, require_detector, FRAME_FIELD};
use super::http_server::AppState;
use super::upload::UploadForm;
use crate::anchors::{Anchor, NewAnchor, DEFAULT_LIST_LIMIT};
use crate::llm::{describe_anchor, fallback_anchor_description};
use crate::vision::largest_detection;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveAnchorQuery {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAnchorResponse {
    pub status: String,
    /// Label of the detection the anchor was taken from
    pub label: String,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAnchorsQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAnchorResponse {
    pub status: String,
    pub id: i64,
}

fn storage_error(e: anyhow::Error) -> ApiError {
    error!("Anchor store error: {:#}", e);
    ApiError::InternalError("Anchor storage failed".to_string())
}

/// POST /api/save_anchor
///
/// Saves the largest object in the uploaded frame under the given name.
/// The name comes from a `name` form field or, failing that, the query string.
pub async fn save_anchor_handler(
    State(state): State<AppState>,
    Query(query): Query<SaveAnchorQuery>,
    multipart: Multipart,
) -> Result<Json<SaveAnchorResponse>, ApiError> {
    let detector = require_detector(&state).await?;
    let form = UploadForm::collect(multipart).await?;

    let name = form
        .text("name")?
        .or(query.name.map(|n| n.trim().to_string()))
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::ValidationError {
            field: "name".to_string(),
            message: "Anchor name is required".to_string(),
        })?;

    let frame = form.file(FRAME_FIELD)?;
    let analysis = analyze_frame(detector, frame.data.clone(), false).await?;

    let best = largest_detection(&analysis.detections)
        .ok_or_else(|| ApiError::NotFound("No objects detected.".to_string()))?;
    let center = best.normalized_center(analysis.width, analysis.height);

    let description = match state.language_model().await {
        Some(llm) => describe_anchor(llm.as_ref(), &name, &best.label, center).await,
        None => fallback_anchor_description(&name),
    };

    let anchor = state
        .anchors
        .create_anchor(NewAnchor::from_normalized(
            name.clone(),
            Some(description),
            center,
        ))
        .map_err(storage_error)?;

    info!(
        "Anchor saved: {} ({} at {:.1}, {:.1})",
        anchor.name, best.label, anchor.x_center, anchor.y_center
    );

    Ok(Json(SaveAnchorResponse {
        status: "Anchor saved".to_string(),
        label: best.label.clone(),
        anchor,
    }))
}

/// GET /api/anchors?skip=&limit=
pub async fn list_anchors_handler(
    State(state): State<AppState>,
    Query(query): Query<ListAnchorsQuery>,
) -> Result<Json<Vec<Anchor>>, ApiError> {
    let anchors = state
        .anchors
        .list_anchors(
            query.skip.unwrap_or(0),
            query.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        )
        .map_err(storage_error)?;
    Ok(Json(anchors))
}

/// GET /api/anchors/:name
pub async fn get_anchor_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Anchor>, ApiError> {
    state
        .anchors
        .get_anchor_by_name(&name)
        .map_err(storage_error)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Anchor '{}' not found", name)))
}

/// DELETE /api/anchors/:id
pub async fn delete_anchor_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAnchorResponse>, ApiError> {
    let id: i64 = id.parse().map_err(|_| ApiError::ValidationError {
        field: "id".to_string(),
        message: format!("Anchor id must be an integer, got '{}'", id),
    })?;

    if !state.anchors.delete_anchor(id).map_err(storage_error)? {
        return Err(ApiError::NotFound(format!("Anchor {} not found", id)));
    }

    info!("Anchor {} deleted", id);
    Ok(Json(DeleteAnchorResponse {
        status: "deleted".to_string(),
        id,
    }))
}
