// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detector seam

use anyhow::Result;
use image::DynamicImage;

use super::detection::{describe_detections, Detection, RawDetection};

/// Backend that finds objects in a single frame.
///
/// Implementations return boxes in the pixel space of the frame they were
/// given; spatial description happens in [`detect_and_describe`].
pub trait ObjectDetector: Send + Sync {
    /// Backend identifier, reported by the health endpoint
    fn name(&self) -> &str;

    fn detect(&self, frame: &DynamicImage) -> Result<Vec<RawDetection>>;
}

/// Run a detector and attach direction and distance phrases to every hit
pub fn detect_and_describe(
    detector: &dyn ObjectDetector,
    frame: &DynamicImage,
) -> Result<Vec<Detection>> {
    let raw = detector.detect(frame)?;
    Ok(describe_detections(raw, frame.width(), frame.height()))
}
