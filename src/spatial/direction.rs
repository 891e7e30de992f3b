// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relative direction of a detection from its normalized center

use std::fmt;

use super::NormalizedPoint;

/// Left edge of the "slightly left" band
const FAR_LEFT_LIMIT: f64 = 0.35;
/// Left edge of the "directly ahead" band
const SLIGHTLY_LEFT_LIMIT: f64 = 0.45;
/// Right edge of the "directly ahead" band
const AHEAD_LIMIT: f64 = 0.55;
/// Right edge of the "slightly right" band
const SLIGHTLY_RIGHT_LIMIT: f64 = 0.65;

/// Upper edge of the level band (y grows downward)
const UP_LIMIT: f64 = 0.35;
/// Lower edge of the level band
const DOWN_LIMIT: f64 = 0.65;

/// Horizontal position, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalBucket {
    FarLeft,
    SlightlyLeft,
    Ahead,
    SlightlyRight,
    FarRight,
}

impl HorizontalBucket {
    pub const ALL: [HorizontalBucket; 5] = [
        HorizontalBucket::FarLeft,
        HorizontalBucket::SlightlyLeft,
        HorizontalBucket::Ahead,
        HorizontalBucket::SlightlyRight,
        HorizontalBucket::FarRight,
    ];

    /// Classify a normalized x coordinate.
    ///
    /// The ahead band is closed on both sides: 0.45 and 0.55 are both ahead.
    pub fn classify(x: f64) -> Self {
        if x < FAR_LEFT_LIMIT {
            HorizontalBucket::FarLeft
        } else if x < SLIGHTLY_LEFT_LIMIT {
            HorizontalBucket::SlightlyLeft
        } else if x > SLIGHTLY_RIGHT_LIMIT {
            HorizontalBucket::FarRight
        } else if x > AHEAD_LIMIT {
            HorizontalBucket::SlightlyRight
        } else {
            HorizontalBucket::Ahead
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            HorizontalBucket::FarLeft => "far left",
            HorizontalBucket::SlightlyLeft => "slightly left",
            HorizontalBucket::Ahead => "directly ahead",
            HorizontalBucket::SlightlyRight => "slightly right",
            HorizontalBucket::FarRight => "far right",
        }
    }
}

/// Vertical position, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalBucket {
    Up,
    Level,
    Down,
}

impl VerticalBucket {
    pub const ALL: [VerticalBucket; 3] =
        [VerticalBucket::Up, VerticalBucket::Level, VerticalBucket::Down];

    pub fn classify(y: f64) -> Self {
        if y < UP_LIMIT {
            VerticalBucket::Up
        } else if y > DOWN_LIMIT {
            VerticalBucket::Down
        } else {
            VerticalBucket::Level
        }
    }

    /// Qualifier appended to the horizontal phrase; empty when level
    pub fn phrase(self) -> &'static str {
        match self {
            VerticalBucket::Up => "up",
            VerticalBucket::Level => "",
            VerticalBucket::Down => "down",
        }
    }
}

/// Composed direction for a single detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectionPhrase {
    pub horizontal: HorizontalBucket,
    pub vertical: VerticalBucket,
}

impl DirectionPhrase {
    pub fn new(horizontal: HorizontalBucket, vertical: VerticalBucket) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn from_point(point: NormalizedPoint) -> Self {
        Self::new(
            HorizontalBucket::classify(point.x),
            VerticalBucket::classify(point.y),
        )
    }
}

impl fmt::Display for DirectionPhrase {
    /// "directly ahead" joins its qualifier with a comma, every other
    /// horizontal bucket joins with "and".
    // TODO: confirm the comma form for "directly ahead" with product review.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let horizontal = self.horizontal.phrase();
        match (self.horizontal, self.vertical) {
            (_, VerticalBucket::Level) => f.write_str(horizontal),
            (HorizontalBucket::Ahead, vertical) => {
                write!(f, "{}, {}", horizontal, vertical.phrase())
            }
            (_, vertical) => write!(f, "{} and {}", horizontal, vertical.phrase()),
        }
    }
}

/// Direction phrase for a normalized box center (0.0 = left/top, 1.0 = right/bottom)
pub fn describe_direction(x: f64, y: f64) -> String {
    DirectionPhrase::from_point(NormalizedPoint::new(x, y)).to_string()
}
