// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection types shared by detector backends, the guidance prompt and the API

use serde::{Deserialize, Serialize};

use crate::spatial::{NormalizedExtent, NormalizedPoint};

/// Box in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        (self.x_max - self.x_min).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y_max - self.y_min).max(0)
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) as f64 / 2.0,
            (self.y_min + self.y_max) as f64 / 2.0,
        )
    }
}

/// Detector output before spatial description, in frame pixels
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub label: String,
    pub confidence: f32,
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl RawDetection {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }
}

/// A detected object with its spoken-style position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub relative_direction: String,
    pub distance_estimate: String,
}

impl Detection {
    /// Describe a raw detection relative to the frame it was found in.
    ///
    /// Direction and distance are computed from the float box before it is
    /// truncated to integer pixels.
    pub fn from_raw(raw: RawDetection, frame_width: u32, frame_height: u32) -> Self {
        let width = raw.width() as f64;
        let height = raw.height() as f64;
        let center = NormalizedPoint::from_pixels(
            raw.x_min as f64 + width / 2.0,
            raw.y_min as f64 + height / 2.0,
            frame_width,
            frame_height,
        );
        let extent = NormalizedExtent::from_pixels(width, height, frame_width, frame_height);

        Self {
            relative_direction: center.direction().to_string(),
            distance_estimate: extent.distance().to_string(),
            bbox: BoundingBox {
                x_min: raw.x_min as i32,
                y_min: raw.y_min as i32,
                x_max: raw.x_max as i32,
                y_max: raw.y_max as i32,
            },
            confidence: raw.confidence,
            label: raw.label,
        }
    }

    /// Box center normalized against the frame
    pub fn normalized_center(&self, frame_width: u32, frame_height: u32) -> NormalizedPoint {
        let (x, y) = self.bbox.center();
        NormalizedPoint::from_pixels(x, y, frame_width, frame_height)
    }
}

/// Describe every raw detection from one frame
pub fn describe_detections(
    raw: Vec<RawDetection>,
    frame_width: u32,
    frame_height: u32,
) -> Vec<Detection> {
    raw.into_iter()
        .map(|r| Detection::from_raw(r, frame_width, frame_height))
        .collect()
}

/// The detection covering the most pixels; the first one wins ties
pub fn largest_detection(detections: &[Detection]) -> Option<&Detection> {
    detections.iter().fold(None, |best: Option<&Detection>, det| match best {
        Some(b) if b.bbox.area() >= det.bbox.area() => Some(b),
        _ => Some(det),
    })
}
