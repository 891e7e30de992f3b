// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-server navigation state: what the user is looking for and what the
//! camera saw last.
//!
//! The session is owned by the HTTP `AppState` and handed to handlers; there
//! is no process-wide instance.

use thiserror::Error;
use tracing::info;

use crate::vision::Detection;

/// Target used when none has been chosen
pub const DEFAULT_TARGET: &str = "person";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("target name must not be empty")]
    EmptyTarget,
}

#[derive(Debug, Clone)]
pub struct NavigationSession {
    current_target: Option<String>,
    fallback_target: String,
    last_detections: Vec<Detection>,
}

impl NavigationSession {
    /// Start a session aimed at `default_target`, which is also the fallback
    /// once the target is cleared
    pub fn new(default_target: impl Into<String>) -> Self {
        let default_target = default_target.into();
        Self {
            current_target: Some(default_target.clone()),
            fallback_target: default_target,
            last_detections: Vec::new(),
        }
    }

    pub fn set_target(&mut self, name: &str) -> Result<&str, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyTarget);
        }
        info!("Target set to: {}", name);
        Ok(self.current_target.insert(name.to_string()).as_str())
    }

    pub fn clear_target(&mut self) {
        self.current_target = None;
    }

    pub fn current_target(&self) -> Option<&str> {
        self.current_target.as_deref()
    }

    /// The chosen target, or the fallback when cleared
    pub fn target_or_default(&self) -> &str {
        self.current_target
            .as_deref()
            .unwrap_or(&self.fallback_target)
    }

    pub fn update_detections(&mut self, detections: Vec<Detection>) {
        self.last_detections = detections;
    }

    pub fn last_detections(&self) -> &[Detection] {
        &self.last_detections
    }
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}
