// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form collection for frame and audio uploads

use axum::body::Bytes;
use axum_extra::extract::Multipart;
use std::collections::HashMap;

use super::errors::ApiError;

#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Every part of a multipart body, keyed by field name
#[derive(Debug, Default)]
pub struct UploadForm {
    parts: HashMap<String, UploadedPart>,
}

impl UploadForm {
    /// Drain the request body; later parts replace earlier ones with the same name
    pub async fn collect(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut parts = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(|e| {
                ApiError::InvalidRequest(format!("Failed to read field '{}': {}", name, e))
            })?;
            parts.insert(name, UploadedPart { file_name, data });
        }
        Ok(Self { parts })
    }

    /// A required binary part
    pub fn file(&self, field: &str) -> Result<&UploadedPart, ApiError> {
        self.parts.get(field).ok_or_else(|| ApiError::ValidationError {
            field: field.to_string(),
            message: format!("Missing form field '{}'", field),
        })
    }

    /// An optional text part, trimmed
    pub fn text(&self, field: &str) -> Result<Option<String>, ApiError> {
        match self.parts.get(field) {
            None => Ok(None),
            Some(part) => std::str::from_utf8(&part.data)
                .map(|s| Some(s.trim().to_string()))
                .map_err(|_| ApiError::ValidationError {
                    field: field.to_string(),
                    message: format!("Form field '{}' is not valid UTF-8", field),
                }),
        }
    }
}
