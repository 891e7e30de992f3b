// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::spatial::NormalizedPoint;

/// A user-named location saved from a camera frame.
///
/// `x_center` and `y_center` are the saved object's center on a 0-100 scale
/// of the frame width and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub x_center: f64,
    pub y_center: f64,
    pub created_at: DateTime<Utc>,
}

impl Anchor {
    /// Center back on the 0-1 scale used by the spatial describer
    pub fn normalized_center(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.x_center / 100.0, self.y_center / 100.0)
    }
}

/// Fields supplied when saving an anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnchor {
    pub name: String,
    pub description: Option<String>,
    pub x_center: f64,
    pub y_center: f64,
}

impl NewAnchor {
    /// Build from a normalized (0-1) center
    pub fn from_normalized(
        name: impl Into<String>,
        description: Option<String>,
        center: NormalizedPoint,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            x_center: center.x * 100.0,
            y_center: center.y * 100.0,
        }
    }
}
