// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Anchor endpoint tests
//!
//! Covers saving an anchor from a frame (largest detection, LLM description
//! with fallback) and the list/get/delete routes.

use super::common::*;
use axum::http::StatusCode;
use clear_path_node::{
    anchors::NewAnchor,
    api::AppState,
    llm::LanguageModel,
    vision::ObjectDetector,
};
use serde_json::json;
use std::sync::Arc;

fn scene_detector() -> Arc<dyn ObjectDetector> {
    Arc::new(FixedDetector(vec![
        raw("cup", 0.9, 10.0, 10.0, 60.0, 60.0),
        raw("person", 0.8, 256.0, 96.0, 384.0, 384.0),
        raw("chair", 0.7, 500.0, 300.0, 600.0, 400.0),
    ]))
}

fn save_request(name: Option<&str>) -> axum::http::Request<axum::body::Body> {
    let png = png_bytes(640, 480);
    let mut parts = vec![file_part("file", "frame.png", &png)];
    if let Some(name) = name {
        parts.push(text_part("name", name));
    }
    multipart_request("/api/save_anchor", &parts)
}

fn seed(state: &AppState, names: &[&str]) {
    for (i, name) in names.iter().enumerate() {
        state
            .anchors
            .create_anchor(NewAnchor {
                name: name.to_string(),
                description: None,
                x_center: 10.0 * i as f64,
                y_center: 50.0,
            })
            .unwrap();
    }
}

#[tokio::test]
async fn test_save_anchor_uses_largest_detection() {
    let model = ScriptedModel::answering("A tall figure in a red coat.");
    let state = state_with(
        Some(scene_detector()),
        Some(model.clone() as Arc<dyn LanguageModel>),
    )
    .await;

    let (status, body) = send(app(state.clone()), save_request(Some("front desk"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Anchor saved");
    assert_eq!(body["label"], "person");
    assert_eq!(body["anchor"]["name"], "front desk");
    assert_eq!(body["anchor"]["x_center"], json!(50.0));
    assert_eq!(body["anchor"]["y_center"], json!(50.0));
    assert_eq!(body["anchor"]["description"], "A tall figure in a red coat.");

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts[0].1, "Describe the front desk.");
    assert!(prompts[0].0.contains("\"label\":\"person\""));

    let stored = state.anchors.get_anchor_by_name("front desk").unwrap().unwrap();
    assert_eq!(stored.description.as_deref(), Some("A tall figure in a red coat."));
}

#[tokio::test]
async fn test_save_anchor_description_fallbacks() {
    let state = state_with(Some(scene_detector()), None).await;
    let (_, body) = send(app(state), save_request(Some("desk"))).await;
    assert_eq!(body["anchor"]["description"], "Auto-saved anchor for desk");

    let state = state_with(
        Some(scene_detector()),
        Some(ScriptedModel::failing() as Arc<dyn LanguageModel>),
    )
    .await;
    let (status, body) = send(app(state), save_request(Some("desk"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anchor"]["description"], "Auto-saved anchor for desk");
}

#[tokio::test]
async fn test_save_anchor_name_from_query() {
    let state = state_with(Some(scene_detector()), None).await;
    let png = png_bytes(640, 480);
    let request = multipart_request(
        "/api/save_anchor?name=sofa",
        &[file_part("file", "frame.png", &png)],
    );

    let (status, body) = send(app(state), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anchor"]["name"], "sofa");
}

#[tokio::test]
async fn test_save_anchor_requires_name() {
    let state = state_with(Some(scene_detector()), None).await;
    let (status, body) = send(app(state.clone()), save_request(None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "name");

    let (status, _) = send(app(state), save_request(Some("   "))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_anchor_no_detections() {
    let state = state_with(Some(Arc::new(FixedDetector(Vec::new()))), None).await;
    let (status, body) = send(app(state.clone()), save_request(Some("desk"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No objects detected.");
    assert!(state.anchors.list_anchors(0, 10).unwrap().is_empty());
}

#[tokio::test]
async fn test_save_anchor_invalid_image() {
    let state = state_with(Some(scene_detector()), None).await;
    let request = multipart_request(
        "/api/save_anchor",
        &[
            file_part("file", "frame.png", b"\x00\x01\x02"),
            text_part("name", "desk"),
        ],
    );
    let (status, _) = send(app(state), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_anchor_without_detector() {
    let state = state_with(None, None).await;
    let (status, _) = send(app(state), save_request(Some("desk"))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_list_anchors_pagination() {
    let state = state_with(None, None).await;
    seed(&state, &["door", "sink", "stove", "table"]);

    let (status, body) = send(app(state.clone()), empty_request("GET", "/api/anchors")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (_, body) = send(
        app(state),
        empty_request("GET", "/api/anchors?skip=1&limit=2"),
    )
    .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["sink", "stove"]);
}

#[tokio::test]
async fn test_list_anchors_huge_skip_is_empty() {
    let state = state_with(None, None).await;
    seed(&state, &["door", "sink"]);

    let (status, body) = send(
        app(state),
        empty_request("GET", "/api/anchors?skip=18446744073709551615&limit=5"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_anchor_by_name() {
    let state = state_with(None, None).await;
    seed(&state, &["door"]);

    let (status, body) = send(app(state.clone()), empty_request("GET", "/api/anchors/door")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "door");
    assert!(body["created_at"].is_string());

    let (status, body) = send(app(state), empty_request("GET", "/api/anchors/window")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
}

#[tokio::test]
async fn test_delete_anchor() {
    let state = state_with(None, None).await;
    seed(&state, &["door"]);
    let id = state.anchors.get_anchor_by_name("door").unwrap().unwrap().id;

    let uri = format!("/api/anchors/{}", id);
    let (status, body) = send(app(state.clone()), empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");
    assert_eq!(body["id"], id);

    let (status, _) = send(app(state.clone()), empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app(state), empty_request("DELETE", "/api/anchors/door")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "id");
}
