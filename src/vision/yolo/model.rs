// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 ONNX detector

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use ndarray::{Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

use super::labels::coco_labels;
use super::postprocess::{decode_predictions, YoloParams};
use super::preprocessing::preprocess_for_detection;
use crate::vision::detection::RawDetection;
use crate::vision::detector::ObjectDetector;

/// Object detector backed by an Ultralytics YOLOv8 export.
///
/// Runs on CPU through ONNX Runtime. The session is shared behind a mutex
/// because inference needs exclusive access.
#[derive(Clone)]
pub struct YoloDetector {
    session: Arc<Mutex<Session>>,
    input_name: String,
    params: YoloParams,
    labels: Vec<String>,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("params", &self.params)
            .field("labels", &self.labels.len())
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load a YOLO model from an `.onnx` file
    ///
    /// # Errors
    /// Returns error if the file is missing or ONNX Runtime rejects it.
    pub fn new<P: AsRef<Path>>(model_path: P, params: YoloParams) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("YOLO model not found: {}", model_path.display());
        }

        info!("Loading YOLO model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load YOLO model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        debug!("YOLO model input: {}", input_name);
        info!("YOLO model loaded (CPU-only)");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            params,
            labels: coco_labels(),
        })
    }
}

impl ObjectDetector for YoloDetector {
    fn name(&self) -> &str {
        "yolov8"
    }

    fn detect(&self, frame: &DynamicImage) -> Result<Vec<RawDetection>> {
        let start = Instant::now();
        let (input, letterbox) = preprocess_for_detection(frame, self.params.input_size);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("YOLO session lock poisoned"))?;

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("YOLO inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        if output.ndim() != 3 {
            anyhow::bail!("Unexpected YOLO output shape: {:?}", output.shape());
        }

        // [1, 4 + classes, anchors]; some exports emit [1, anchors, 4 + classes]
        let mut predictions = output
            .index_axis(Axis(0), 0)
            .into_dimensionality::<Ix2>()
            .context("YOLO output is not a batch of 2D predictions")?;
        if predictions.nrows() > predictions.ncols() {
            predictions = predictions.reversed_axes();
        }

        let detections = decode_predictions(predictions, &self.params, &letterbox, &self.labels);

        debug!(
            "YOLO found {} objects in {}ms",
            detections.len(),
            start.elapsed().as_millis()
        );

        Ok(detections)
    }
}
