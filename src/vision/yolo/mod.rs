// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detection via ONNX Runtime
//!
//! Components:
//! - `preprocessing` - Letterbox resize into an NCHW tensor
//! - `postprocess` - Prediction decoding and non-maximum suppression
//! - `labels` - COCO class names
//! - `model` - The `ObjectDetector` implementation

pub mod labels;
pub mod model;
pub mod postprocess;
pub mod preprocessing;

pub use labels::{coco_labels, COCO_LABELS};
pub use model::YoloDetector;
pub use postprocess::{decode_predictions, YoloParams};
pub use preprocessing::{letterbox, preprocess_for_detection, LetterboxInfo, YOLO_INPUT_SIZE};
