// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Fakes and request helpers shared by the API tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use clear_path_node::{
    api::{create_app, AppState},
    audio::Transcriber,
    llm::LanguageModel,
    vision::{ObjectDetector, RawDetection, VisionModelManager},
};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt; // for `oneshot`

pub const BOUNDARY: &str = "clear-path-test-boundary";

/// Detector that returns the same boxes for every frame
pub struct FixedDetector(pub Vec<RawDetection>);

impl ObjectDetector for FixedDetector {
    fn name(&self) -> &str {
        "fixed"
    }

    fn detect(&self, _frame: &DynamicImage) -> Result<Vec<RawDetection>> {
        Ok(self.0.clone())
    }
}

pub struct FailingDetector;

impl ObjectDetector for FailingDetector {
    fn name(&self) -> &str {
        "failing"
    }

    fn detect(&self, _frame: &DynamicImage) -> Result<Vec<RawDetection>> {
        Err(anyhow!("inference backend crashed"))
    }
}

/// Language model that records prompts and replays one answer
pub struct ScriptedModel {
    pub reply: Option<String>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.reply.clone().ok_or_else(|| anyhow!("model offline"))
    }
}

/// Transcriber that returns a fixed transcript
pub struct ScriptedTranscriber(pub Option<String>);

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _filename: &str) -> Result<String> {
        self.0.clone().ok_or_else(|| anyhow!("transcription service down"))
    }
}

pub fn raw(label: &str, confidence: f32, x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> RawDetection {
    RawDetection {
        label: label.to_string(),
        confidence,
        x_min,
        y_min,
        x_max,
        y_max,
    }
}

/// Solid gray PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        image::Rgb([128, 128, 128]),
    ));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// One multipart part: field name, optional file name, payload
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

pub fn file_part<'a>(name: &'a str, file_name: &'a str, data: &'a [u8]) -> Part<'a> {
    Part {
        name,
        file_name: Some(file_name),
        data,
    }
}

pub fn text_part<'a>(name: &'a str, value: &'a str) -> Part<'a> {
    Part {
        name,
        file_name: None,
        data: value.as_bytes(),
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test state with an optional detector and language model
pub async fn state_with(
    detector: Option<Arc<dyn ObjectDetector>>,
    llm: Option<Arc<dyn LanguageModel>>,
) -> AppState {
    let state = AppState::new_for_test().unwrap();
    if let Some(detector) = detector {
        *state.vision_model_manager.write().await =
            Some(Arc::new(VisionModelManager::with_detector(detector)));
    }
    *state.llm.write().await = llm;
    state
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };
    (status, json)
}

pub fn app(state: AppState) -> Router {
    create_app(state)
}
