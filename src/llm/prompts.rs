// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! System prompts for guidance and anchor descriptions

/// Prompt for the per-frame guidance call.
///
/// `anchor_json` and `detection_json` are the outputs of
/// [`format_anchors_for_llm`](super::format_anchors_for_llm) and
/// [`format_detections_for_llm`](super::format_detections_for_llm).
pub fn guidance_system_prompt(target_name: &str, anchor_json: &str, detection_json: &str) -> String {
    format!(
        r#"
You are an assistive navigation guide for a visually impaired user. Be concise and actionable.

User is looking for "{target_name}".

Known anchors (memory of previous saves):
{anchor_json}

Current camera detections:
{detection_json}

Respond with ONE short sentence that tells the user where to look or move (direction + rough distance). If the target is not detected, say so and mention the most relevant nearby object instead.
"#
    )
}

/// Prompt asking for a short, findable description of a newly saved anchor
pub fn description_system_prompt(detected_objects_json: &str, target_name: &str) -> String {
    format!(
        r#"
You are a highly detailed object descriptor for a vision assistant.

**TASK:**
1.  Analyze the provided JSON list of currently detected objects.
2.  Find the object most closely matching the user's requested name: "{target_name}".
3.  Generate a **concise, single-sentence** description (max 20 words) for the chosen object.
4.  The description must focus on color, size, and unique features that will help a user locate it later.
5.  Do NOT include the word 'detected' or its coordinates. Only output the description text.

---
**DETECTED OBJECTS:**
{detected_objects_json}
"#
    )
}
