// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command-line flags
//!
//! Every flag can also be set through the environment variable named in its
//! help text. A flag wins over its variable, which wins over the config file.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::NodeConfig;

/// Clear Path assistive navigation node
#[derive(Parser, Debug, Default)]
#[command(name = "clear-path-node")]
#[command(version)]
#[command(about = "Object detection and spoken guidance for visually impaired users", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "CLEAR_PATH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address the HTTP API binds to
    #[arg(long, env = "LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// SQLite file holding saved anchors
    #[arg(long, env = "DATABASE_PATH")]
    pub database_path: Option<String>,

    /// YOLOv8 ONNX model
    #[arg(long, env = "YOLO_MODEL_PATH")]
    pub yolo_model: Option<String>,

    /// Minimum detection confidence
    #[arg(long, env = "YOLO_CONFIDENCE")]
    pub confidence_threshold: Option<f32>,

    /// OpenAI-compatible chat endpoint for guidance
    #[arg(long, env = "LLM_ENDPOINT")]
    pub llm_endpoint: Option<String>,

    #[arg(long, env = "LLM_MODEL")]
    pub llm_model: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Answer with the fallback sentence instead of calling a model
    #[arg(long)]
    pub disable_llm: bool,

    /// OpenAI-compatible transcription endpoint; voice targeting is off without it
    #[arg(long, env = "TRANSCRIPTION_ENDPOINT")]
    pub transcription_endpoint: Option<String>,

    #[arg(long, env = "TRANSCRIPTION_API_KEY", hide_env_values = true)]
    pub transcription_api_key: Option<String>,

    /// Target used until the user picks one
    #[arg(long, env = "DEFAULT_TARGET")]
    pub default_target: Option<String>,
}

impl Cli {
    /// Build the effective configuration: file (if any) then flags
    pub fn load_config(&self) -> Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_file(path)?,
            None => NodeConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut NodeConfig) {
        if let Some(addr) = &self.listen_addr {
            config.server.listen_addr = addr.clone();
        }
        if let Some(path) = &self.database_path {
            config.storage.database_path = path.clone();
        }
        if let Some(path) = &self.yolo_model {
            config.vision.yolo_model_path = Some(path.clone());
        }
        if let Some(threshold) = self.confidence_threshold {
            config.vision.confidence_threshold = threshold;
        }
        if let Some(endpoint) = &self.llm_endpoint {
            config.llm.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.llm_model {
            config.llm.model = model.clone();
        }
        if let Some(key) = &self.llm_api_key {
            config.llm.api_key = Some(key.clone());
        }
        if self.disable_llm {
            config.llm.enabled = false;
        }
        if let Some(endpoint) = &self.transcription_endpoint {
            config.transcription.endpoint = Some(endpoint.clone());
        }
        if let Some(key) = &self.transcription_api_key {
            config.transcription.api_key = Some(key.clone());
        }
        if let Some(target) = &self.default_target {
            config.session.default_target = target.clone();
        }
    }
}
