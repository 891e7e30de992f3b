// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Spoken guidance via a hosted language model
//!
//! This module provides:
//! - An OpenAI-compatible chat client (Gemini by default)
//! - Prompt construction from detections and saved anchors
//! - Clean-up of model replies before they reach the user

pub mod client;
pub mod format;
pub mod guidance;
pub mod prompts;
pub mod utils;

pub use client::{LanguageModel, LlmClient, LlmConfig, DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL};
pub use format::{format_anchors_for_llm, format_detections_for_llm};
pub use guidance::{
    describe_anchor, fallback_anchor_description, generate_guidance, GUIDANCE_FAILURE_TEXT,
    GUIDANCE_UNAVAILABLE_TEXT,
};
pub use prompts::{description_system_prompt, guidance_system_prompt};
pub use utils::clean_llm_response;
