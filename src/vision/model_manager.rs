// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision model manager for loading the object detector

use std::sync::Arc;

use crate::vision::detector::ObjectDetector;
use crate::vision::yolo::{YoloDetector, YoloParams};

/// Configuration for loading vision models
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    /// Path to the YOLO `.onnx` file (optional)
    pub yolo_model_path: Option<String>,
    /// Post-processing thresholds
    pub yolo_params: YoloParams,
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        Self {
            yolo_model_path: Some("./models/yolov8n.onnx".to_string()),
            yolo_params: YoloParams::default(),
        }
    }
}

/// Holds the object detector shared by all requests.
///
/// A missing or unreadable model is logged and leaves the detector empty, so
/// the server still starts and frame endpoints answer 503.
pub struct VisionModelManager {
    detector: Option<Arc<dyn ObjectDetector>>,
}

impl VisionModelManager {
    pub async fn new(config: VisionModelConfig) -> anyhow::Result<Self> {
        let detector = if let Some(ref path) = config.yolo_model_path {
            match YoloDetector::new(path, config.yolo_params) {
                Ok(model) => {
                    tracing::info!("✅ YOLO detector loaded from {}", path);
                    Some(Arc::new(model) as Arc<dyn ObjectDetector>)
                }
                Err(e) => {
                    tracing::warn!("⚠️ Failed to load YOLO detector from {}: {}", path, e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self { detector })
    }

    /// Wrap an already constructed detector
    pub fn with_detector(detector: Arc<dyn ObjectDetector>) -> Self {
        Self {
            detector: Some(detector),
        }
    }

    pub fn get_detector(&self) -> Option<Arc<dyn ObjectDetector>> {
        self.detector.clone()
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

}
