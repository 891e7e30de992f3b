// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Target selection endpoint tests (text, voice, get, clear) and /health

use super::common::*;
use axum::http::StatusCode;
use clear_path_node::{api::AppState, audio::Transcriber};
use serde_json::json;
use std::sync::Arc;

async fn state_with_transcript(transcript: Option<&str>) -> AppState {
    let state = state_with(None, None).await;
    *state.transcriber.write().await = Some(Arc::new(ScriptedTranscriber(
        transcript.map(str::to_string),
    )) as Arc<dyn Transcriber>);
    state
}

fn audio_request() -> axum::http::Request<axum::body::Body> {
    multipart_request(
        "/api/set_target_from_audio",
        &[file_part("audio_file", "command.wav", b"RIFF....WAVEfmt ")],
    )
}

#[tokio::test]
async fn test_set_target_text() {
    let state = state_with(None, None).await;
    let (status, body) = send(
        app(state.clone()),
        json_request("POST", "/api/set_target_text", json!({"name": "  water bottle "})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["target"], "water bottle");
    assert_eq!(
        state.session.read().await.current_target(),
        Some("water bottle")
    );
}

#[tokio::test]
async fn test_set_target_text_rejects_blank() {
    let state = state_with(None, None).await;
    let (status, body) = send(
        app(state.clone()),
        json_request("POST", "/api/set_target_text", json!({"name": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(state.session.read().await.current_target(), Some("person"));
}

#[tokio::test]
async fn test_get_and_clear_target() {
    let state = state_with(None, None).await;

    let (status, body) = send(app(state.clone()), empty_request("GET", "/api/target")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "person");

    let (status, body) = send(app(state.clone()), empty_request("DELETE", "/api/target")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["target"].is_null());

    let (_, body) = send(app(state), empty_request("GET", "/api/target")).await;
    assert!(body["target"].is_null());
}

#[tokio::test]
async fn test_set_target_from_audio() {
    let state = state_with_transcript(Some("Where is my coffee mug?")).await;
    let (status, body) = send(app(state.clone()), audio_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["target"], "coffee mug");
    assert_eq!(body["transcript"], "Where is my coffee mug?");
    assert_eq!(
        state.session.read().await.current_target(),
        Some("coffee mug")
    );
}

#[tokio::test]
async fn test_set_target_from_audio_with_greeting() {
    let state = state_with_transcript(Some("Hey, could you find my wallet?")).await;
    let (status, body) = send(app(state.clone()), audio_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "wallet");
    assert_eq!(state.session.read().await.current_target(), Some("wallet"));
}

#[tokio::test]
async fn test_set_target_from_audio_no_object() {
    let state = state_with_transcript(Some("Where is the")).await;
    let (status, body) = send(app(state.clone()), audio_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No target identified.");
    assert_eq!(state.session.read().await.current_target(), Some("person"));
}

#[tokio::test]
async fn test_set_target_from_audio_empty_transcript() {
    let state = state_with_transcript(Some("  ")).await;
    let (status, body) = send(app(state), audio_request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Could not transcribe audio.");
}

#[tokio::test]
async fn test_set_target_from_audio_transcriber_error() {
    let state = state_with_transcript(None).await;
    let (status, _) = send(app(state), audio_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_target_from_audio_missing_field() {
    let state = state_with_transcript(Some("find the door")).await;
    let request = multipart_request(
        "/api/set_target_from_audio",
        &[file_part("file", "command.wav", b"RIFF")],
    );
    let (status, body) = send(app(state), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "audio_file");
}

#[tokio::test]
async fn test_set_target_from_audio_without_transcriber() {
    let state = state_with(None, None).await;
    let (status, body) = send(app(state), audio_request()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_type"], "service_unavailable");
}

#[tokio::test]
async fn test_health_reports_components() {
    let state = state_with(None, None).await;
    let (status, body) = send(app(state), empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["detector"].is_null());
    assert!(body["llm"].is_null());
    assert_eq!(body["voice_targeting"], false);
    assert_eq!(body["target"], "person");

    let state = state_with(
        Some(Arc::new(FixedDetector(Vec::new()))),
        Some(ScriptedModel::answering("ok") as Arc<dyn clear_path_node::llm::LanguageModel>),
    )
    .await;
    let (_, body) = send(app(state), empty_request("GET", "/health")).await;
    assert_eq!(body["detector"], "fixed");
    assert_eq!(body["llm"], "scripted");
}
