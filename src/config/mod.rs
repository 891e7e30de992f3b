// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables and command-line flags (see [`crate::cli`]).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::audio::WhisperConfig;
use crate::llm::{LlmConfig, DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL};
use crate::session::DEFAULT_TARGET;
use crate::vision::{VisionModelConfig, YoloParams};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub server: ServerConfig,
    pub vision: VisionConfig,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub yolo_model_path: Option<String>,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Voice targeting is disabled when unset
    pub endpoint: Option<String>,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub default_target: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        let params = YoloParams::default();
        Self {
            yolo_model_path: VisionModelConfig::default().yolo_model_path,
            confidence_threshold: params.confidence_threshold,
            iou_threshold: params.iou_threshold,
            max_detections: params.max_detections,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
            timeout_secs: LlmConfig::default().timeout_secs,
        }
    }
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        let whisper = WhisperConfig::default();
        Self {
            endpoint: None,
            model: whisper.model,
            api_key: None,
            language: whisper.language,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./data/clear_path.db".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_target: DEFAULT_TARGET.to_string(),
        }
    }
}

impl NodeConfig {
    /// Load from a TOML file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_vision_config(&self) -> VisionModelConfig {
        VisionModelConfig {
            yolo_model_path: self.vision.yolo_model_path.clone(),
            yolo_params: YoloParams {
                confidence_threshold: self.vision.confidence_threshold,
                iou_threshold: self.vision.iou_threshold,
                max_detections: self.vision.max_detections,
                ..YoloParams::default()
            },
        }
    }

    /// `None` when guidance is switched off
    pub fn to_llm_config(&self) -> Option<LlmConfig> {
        if !self.llm.enabled {
            return None;
        }
        Some(LlmConfig {
            endpoint: self.llm.endpoint.clone(),
            model: self.llm.model.clone(),
            api_key: self.llm.api_key.clone(),
            timeout_secs: self.llm.timeout_secs,
            ..LlmConfig::default()
        })
    }

    /// `None` when no transcription endpoint is configured
    pub fn to_whisper_config(&self) -> Option<WhisperConfig> {
        let endpoint = self.transcription.endpoint.clone()?;
        Some(WhisperConfig {
            endpoint,
            model: self.transcription.model.clone(),
            api_key: self.transcription.api_key.clone(),
            language: self.transcription.language.clone(),
            ..WhisperConfig::default()
        })
    }
}
