// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/process_frame tests
//!
//! Verifies that the frame endpoint:
//! - Returns spatially described detections and an annotated JPEG
//! - Asks the language model about the current target
//! - Falls back to fixed sentences when guidance is unavailable
//! - Maps bad uploads and detector failures to the right status codes

use super::common::*;
use axum::http::StatusCode;
use clear_path_node::{
    anchors::NewAnchor,
    llm::{LanguageModel, GUIDANCE_FAILURE_TEXT, GUIDANCE_UNAVAILABLE_TEXT},
    vision::ObjectDetector,
};
use std::sync::Arc;

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;

fn scene_detector() -> Arc<dyn ObjectDetector> {
    Arc::new(FixedDetector(vec![
        // Small box in the top-left corner
        raw("cup", 0.81234, 0.0, 0.0, 48.0, 36.0),
        // Tall box in the middle of the frame
        raw("person", 0.93, 256.0, 96.0, 384.0, 384.0),
    ]))
}

fn frame_request() -> axum::http::Request<axum::body::Body> {
    let png = png_bytes(FRAME_WIDTH, FRAME_HEIGHT);
    multipart_request("/api/process_frame", &[file_part("file", "frame.png", &png)])
}

#[tokio::test]
async fn test_process_frame_full_response() {
    let model = ScriptedModel::answering("```\nThe person is right in front of you.\n```");
    let state = state_with(
        Some(scene_detector()),
        Some(model.clone() as Arc<dyn LanguageModel>),
    )
    .await;

    let (status, body) = send(app(state), frame_request()).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["status"], "guiding");
    assert_eq!(body["target"], "person");
    assert_eq!(body["audio_path"], "");
    assert_eq!(body["guidance_text"], "The person is right in front of you.");
    assert!(body["annotated_image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));

    let detections = body["detections"].as_array().unwrap();
    assert_eq!(detections.len(), 2);

    assert_eq!(detections[0]["label"], "cup");
    assert_eq!(detections[0]["relative_direction"], "far left and up");
    assert_eq!(
        detections[0]["distance_estimate"],
        "far away (more than 2.5 meters)"
    );
    assert_eq!(detections[0]["box"]["x_max"], 48);
    assert_eq!(detections[0]["box"]["y_max"], 36);

    assert_eq!(detections[1]["relative_direction"], "directly ahead");
    assert_eq!(
        detections[1]["distance_estimate"],
        "very close (less than half an arm's length)"
    );

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].1, "Where is the person?");
    assert!(prompts[0].0.contains("\"confidence\": 0.81"));
    assert!(prompts[0].0.contains("far left and up"));
}

#[tokio::test]
async fn test_process_frame_without_llm_uses_fallback() {
    let state = state_with(Some(scene_detector()), None).await;
    let (status, body) = send(app(state), frame_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["guidance_text"], GUIDANCE_UNAVAILABLE_TEXT);
    assert_eq!(body["detections"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_process_frame_llm_failure_does_not_fail_request() {
    let state = state_with(
        Some(scene_detector()),
        Some(ScriptedModel::failing() as Arc<dyn LanguageModel>),
    )
    .await;
    let (status, body) = send(app(state), frame_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["guidance_text"], GUIDANCE_FAILURE_TEXT);
}

#[tokio::test]
async fn test_process_frame_records_detections_on_session() {
    let state = state_with(Some(scene_detector()), None).await;
    let (status, _) = send(app(state.clone()), frame_request()).await;
    assert_eq!(status, StatusCode::OK);

    let session = state.session.read().await;
    let labels: Vec<&str> = session
        .last_detections()
        .iter()
        .map(|d| d.label.as_str())
        .collect();
    assert_eq!(labels, vec!["cup", "person"]);
}

#[tokio::test]
async fn test_process_frame_uses_current_target_and_anchors() {
    let model = ScriptedModel::answering("Your keys are on the left.");
    let state = state_with(
        Some(scene_detector()),
        Some(model.clone() as Arc<dyn LanguageModel>),
    )
    .await;
    state.session.write().await.set_target("keys").unwrap();
    state
        .anchors
        .create_anchor(NewAnchor {
            name: "key hook".to_string(),
            description: Some("brass hook by the door".to_string()),
            x_center: 12.34,
            y_center: 40.0,
        })
        .unwrap();

    let (status, body) = send(app(state), frame_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "keys");

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts[0].1, "Where is the keys?");
    assert!(prompts[0].0.contains("User is looking for \"keys\"."));
    assert!(prompts[0].0.contains("brass hook by the door"));
    assert!(prompts[0].0.contains("\"x\": 12.3"));
}

#[tokio::test]
async fn test_process_frame_falls_back_to_default_target_when_cleared() {
    let state = state_with(Some(scene_detector()), None).await;
    state.session.write().await.clear_target();

    let (_, body) = send(app(state), frame_request()).await;
    assert_eq!(body["target"], "person");
}

#[tokio::test]
async fn test_process_frame_empty_scene() {
    let state = state_with(Some(Arc::new(FixedDetector(Vec::new()))), None).await;
    let (status, body) = send(app(state), frame_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["detections"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_process_frame_invalid_image() {
    let state = state_with(Some(scene_detector()), None).await;
    let request = multipart_request(
        "/api/process_frame",
        &[file_part("file", "frame.png", b"definitely not an image")],
    );

    let (status, body) = send(app(state), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_request");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_process_frame_missing_file_field() {
    let state = state_with(Some(scene_detector()), None).await;
    let request = multipart_request("/api/process_frame", &[text_part("other", "value")]);

    let (status, body) = send(app(state), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "file");
}

#[tokio::test]
async fn test_process_frame_without_detector() {
    let state = state_with(None, None).await;
    let (status, body) = send(app(state), frame_request()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_type"], "service_unavailable");
}

#[tokio::test]
async fn test_process_frame_detector_failure() {
    let state = state_with(Some(Arc::new(FailingDetector)), None).await;
    let (status, body) = send(app(state), frame_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Vision processing failed.");
}
