// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use regex::Regex;
use std::sync::OnceLock;

static FENCE: OnceLock<Regex> = OnceLock::new();

/// Strip a surrounding Markdown code fence (```` ```json ... ``` ````) from a model reply
pub fn clean_llm_response(response: &str) -> String {
    // Opening and closing fences are removed independently
    let fence = FENCE.get_or_init(|| Regex::new(r"^```[a-zA-Z]*\n|\n```$").unwrap());
    fence.replace_all(response.trim(), "").trim().to_string()
}
