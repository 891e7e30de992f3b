// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Guidance and anchor description generation

use tracing::{error, info, warn};

use super::client::LanguageModel;
use super::format::{format_anchors_for_llm, format_detections_for_llm};
use super::prompts::{description_system_prompt, guidance_system_prompt};
use super::utils::clean_llm_response;
use crate::anchors::Anchor;
use crate::spatial::NormalizedPoint;
use crate::vision::Detection;

/// Spoken when the model call fails
pub const GUIDANCE_FAILURE_TEXT: &str =
    "I'm sorry, I'm having trouble thinking right now. Please try again.";

/// Spoken when no model is configured
pub const GUIDANCE_UNAVAILABLE_TEXT: &str =
    "Vision processed, but guidance is temporarily unavailable.";

/// Ask the model for one sentence telling the user where `target_name` is.
///
/// Never fails: a model error yields [`GUIDANCE_FAILURE_TEXT`].
pub async fn generate_guidance(
    llm: &dyn LanguageModel,
    target_name: &str,
    detections: &[Detection],
    anchors: &[Anchor],
) -> String {
    let anchor_json = format_anchors_for_llm(anchors);
    let detection_json = format_detections_for_llm(detections);
    let system_prompt = guidance_system_prompt(target_name, &anchor_json, &detection_json);
    let user_query = format!("Where is the {}?", target_name);

    info!("Querying LLM for target: {}", target_name);

    match llm.complete(&system_prompt, &user_query).await {
        Ok(raw) => clean_llm_response(&raw),
        Err(e) => {
            error!("Failed to query LLM: {:#}", e);
            GUIDANCE_FAILURE_TEXT.to_string()
        }
    }
}

pub fn fallback_anchor_description(name: &str) -> String {
    format!("Auto-saved anchor for {}", name)
}

/// Short description of the object being saved as anchor `name`.
///
/// `center` is the normalized box center of the chosen detection. Falls back
/// to [`fallback_anchor_description`] when the model fails or answers empty.
pub async fn describe_anchor(
    llm: &dyn LanguageModel,
    name: &str,
    label: &str,
    center: NormalizedPoint,
) -> String {
    let detected = serde_json::json!([{
        "label": label,
        "box_coords": [center.x, center.y],
    }]);
    let prompt = description_system_prompt(&detected.to_string(), name);

    match llm.complete(&prompt, &format!("Describe the {}.", name)).await {
        Ok(raw) => {
            let description = clean_llm_response(&raw);
            if description.is_empty() {
                fallback_anchor_description(name)
            } else {
                description
            }
        }
        Err(e) => {
            warn!("Anchor description failed for {}: {:#}", name, e);
            fallback_anchor_description(name)
        }
    }
}
