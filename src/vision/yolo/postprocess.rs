// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of YOLOv8 prediction tensors

use std::cmp::Ordering;

use ndarray::ArrayView2;

use super::labels::label_for;
use super::preprocessing::LetterboxInfo;
use crate::vision::detection::RawDetection;

/// Thresholds applied after inference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloParams {
    pub input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: super::preprocessing::YOLO_INPUT_SIZE,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    class_id: usize,
    score: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl Candidate {
    fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    fn iou(&self, other: &Candidate) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// Decode a `[4 + classes, anchors]` prediction matrix into frame-space detections.
///
/// Rows 0..4 hold center-x, center-y, width and height in letterboxed input
/// pixels; the remaining rows are per-class scores.
pub fn decode_predictions(
    predictions: ArrayView2<f32>,
    params: &YoloParams,
    letterbox: &LetterboxInfo,
    labels: &[String],
) -> Vec<RawDetection> {
    let (rows, anchors) = predictions.dim();
    if rows <= 4 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let mut best_class = 0;
        let mut best_score = f32::NEG_INFINITY;
        for class_id in 0..rows - 4 {
            let score = predictions[[4 + class_id, anchor]];
            if score > best_score {
                best_score = score;
                best_class = class_id;
            }
        }

        if best_score < params.confidence_threshold {
            continue;
        }

        let cx = predictions[[0, anchor]];
        let cy = predictions[[1, anchor]];
        let w = predictions[[2, anchor]];
        let h = predictions[[3, anchor]];
        candidates.push(Candidate {
            class_id: best_class,
            score: best_score,
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        });
    }

    non_max_suppression(candidates, params.iou_threshold, params.max_detections)
        .into_iter()
        .map(|c| {
            let (x_min, y_min) = letterbox.map_to_original(c.x1, c.y1);
            let (x_max, y_max) = letterbox.map_to_original(c.x2, c.y2);
            RawDetection {
                label: label_for(labels, c.class_id),
                confidence: c.score,
                x_min,
                y_min,
                x_max,
                y_max,
            }
        })
        .collect()
}

/// Greedy per-class NMS, highest score first
fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
