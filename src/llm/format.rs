// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON rendering of scene state for prompts

use serde::Serialize;

use crate::anchors::Anchor;
use crate::vision::Detection;

#[derive(Serialize)]
struct AnchorEntry<'a> {
    name: &'a str,
    description: Option<&'a str>,
    location: Location,
}

#[derive(Serialize)]
struct Location {
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct DetectionEntry<'a> {
    label: &'a str,
    confidence: f64,
    position: Position<'a>,
}

#[derive(Serialize)]
struct Position<'a> {
    relative_direction: &'a str,
    distance_estimate: &'a str,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

/// Saved anchors as a pretty JSON list, coordinates rounded to one decimal
pub fn format_anchors_for_llm(anchors: &[Anchor]) -> String {
    let entries: Vec<AnchorEntry<'_>> = anchors
        .iter()
        .map(|anchor| AnchorEntry {
            name: &anchor.name,
            description: anchor.description.as_deref(),
            location: Location {
                x: round_to(anchor.x_center, 1),
                y: round_to(anchor.y_center, 1),
            },
        })
        .collect();
    to_pretty_json(&entries)
}

/// Current detections as a pretty JSON list with their spatial phrases
pub fn format_detections_for_llm(detections: &[Detection]) -> String {
    let entries: Vec<DetectionEntry<'_>> = detections
        .iter()
        .map(|det| DetectionEntry {
            label: &det.label,
            confidence: round_to(det.confidence as f64, 2),
            position: Position {
                relative_direction: &det.relative_direction,
                distance_estimate: &det.distance_estimate,
            },
        })
        .collect();
    to_pretty_json(&entries)
}
