// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Coarse distance estimate from the fraction of the frame a box covers

use std::fmt;

/// Area above which the object is within reach
const VERY_CLOSE_AREA: f64 = 0.10;
const ARMS_LENGTH_AREA: f64 = 0.03;
const FEW_STEPS_AREA: f64 = 0.01;

/// Distance buckets, ordered nearest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DistanceBucket {
    VeryClose,
    ArmsLength,
    FewSteps,
    FarAway,
}

impl DistanceBucket {
    pub const ALL: [DistanceBucket; 4] = [
        DistanceBucket::VeryClose,
        DistanceBucket::ArmsLength,
        DistanceBucket::FewSteps,
        DistanceBucket::FarAway,
    ];

    /// Classify a normalized area. Comparisons are strict, so a value sitting
    /// exactly on a threshold belongs to the farther bucket.
    pub fn from_area(area: f64) -> Self {
        if area > VERY_CLOSE_AREA {
            DistanceBucket::VeryClose
        } else if area > ARMS_LENGTH_AREA {
            DistanceBucket::ArmsLength
        } else if area > FEW_STEPS_AREA {
            DistanceBucket::FewSteps
        } else {
            DistanceBucket::FarAway
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            DistanceBucket::VeryClose => "very close (less than half an arm's length)",
            DistanceBucket::ArmsLength => "about an arm's length (approx. 0.5 - 1.0 meter)",
            DistanceBucket::FewSteps => "a few steps away (approx. 1.0 - 2.5 meters)",
            DistanceBucket::FarAway => "far away (more than 2.5 meters)",
        }
    }
}

impl fmt::Display for DistanceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Distance phrase for a box of normalized width and height
pub fn estimate_distance(width: f64, height: f64) -> String {
    DistanceBucket::from_area(width * height).to_string()
}
