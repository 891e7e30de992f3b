// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Spatial describer
//!
//! Turns a detection's position and size, normalized against the frame, into
//! two short phrases used by the guidance prompt:
//! - a relative direction ("slightly left and up")
//! - a coarse distance bucket ("about an arm's length ...")
//!
//! Both classifiers are pure threshold functions. Inputs are not validated:
//! values outside `[0, 1]` fall into the nearest bucket.

pub mod direction;
pub mod distance;

pub use direction::{describe_direction, DirectionPhrase, HorizontalBucket, VerticalBucket};
pub use distance::{estimate_distance, DistanceBucket};

use serde::{Deserialize, Serialize};

/// Bounding-box center relative to frame width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Normalize a pixel-space point against the frame size
    pub fn from_pixels(x: f64, y: f64, frame_width: u32, frame_height: u32) -> Self {
        Self {
            x: x / frame_width.max(1) as f64,
            y: y / frame_height.max(1) as f64,
        }
    }

    pub fn direction(&self) -> DirectionPhrase {
        DirectionPhrase::from_point(*self)
    }
}

/// Bounding-box size relative to frame width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedExtent {
    pub width: f64,
    pub height: f64,
}

impl NormalizedExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Normalize a pixel-space box size against the frame size
    pub fn from_pixels(width: f64, height: f64, frame_width: u32, frame_height: u32) -> Self {
        Self {
            width: width / frame_width.max(1) as f64,
            height: height / frame_height.max(1) as f64,
        }
    }

    /// Fraction of the frame covered by the box
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn distance(&self) -> DistanceBucket {
        DistanceBucket::from_area(self.area())
    }
}
