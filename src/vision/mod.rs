// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for camera frames
//!
//! This module provides:
//! - Frame decoding and JPEG encoding
//! - Object detection via YOLOv8 on CPU
//! - Spatial description of each detection
//! - Box annotation for the client preview

pub mod annotate;
pub mod detection;
pub mod detector;
pub mod image_utils;
pub mod model_manager;
pub mod yolo;

pub use annotate::annotate_detections;
pub use detection::{
    describe_detections, largest_detection, BoundingBox, Detection, RawDetection,
};
pub use detector::{detect_and_describe, ObjectDetector};
pub use image_utils::{
    decode_image_bytes, detect_format, encode_jpeg, encode_jpeg_data_url, FrameInfo, ImageError,
    MAX_FRAME_BYTES,
};
pub use model_manager::{VisionModelConfig, VisionModelManager};
pub use yolo::{YoloDetector, YoloParams};
