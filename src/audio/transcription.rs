// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Speech-to-text via an OpenAI-compatible transcription endpoint

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Converts recorded speech into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Returns the recognized text, possibly empty
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Base URL, e.g. `http://localhost:8000/v1`
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/v1".to_string(),
            model: "whisper-1".to_string(),
            api_key: None,
            language: Some("en".to_string()),
            timeout_secs: 60,
        }
    }
}

#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for a Whisper-style `/audio/transcriptions` service
pub struct WhisperClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    language: Option<String>,
}

impl WhisperClient {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "Transcription client configured: endpoint={}, model={}",
            endpoint, config.model
        );

        Ok(Self {
            client,
            endpoint,
            model: config.model,
            api_key: config.api_key.filter(|key| !key.is_empty()),
            language: config.language,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let size = audio.len();

        let mut form = Form::new()
            .text("model", self.model.clone())
            .part("file", Part::bytes(audio).file_name(filename.to_string()));
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let mut request = self
            .client
            .post(format!("{}/audio/transcriptions", self.endpoint))
            .multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.context("Transcription request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Transcription service returned {}: {}", status, body));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        debug!(
            "Transcribed {} bytes in {}ms",
            size,
            start.elapsed().as_millis()
        );

        Ok(parsed.text.trim().to_string())
    }
}
