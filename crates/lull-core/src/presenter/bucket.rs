//! Discrete presentation tiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::neutralizer::LEVEL_MAX;

/// Presentation tier derived from the smoothed level.
///
/// Ordered from the regular, untouched content (0) to the most neutral,
/// boring content (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bucket(u8);

impl Bucket {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(4);
    pub const COUNT: usize = 5;

    /// Bucket for index `n`, `None` above 4
    pub fn new(n: u8) -> Option<Self> {
        (n <= Self::MAX.0).then_some(Self(n))
    }

    /// `round(clamp(level, 0, 4))`
    pub fn from_level(level: f64) -> Self {
        let clamped = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, LEVEL_MAX)
        };
        Self(clamped.round() as u8)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Bucket> {
        (0..=Self::MAX.0).map(Bucket)
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            0 => "ambient",
            1 => "quiet",
            2 => "muted",
            3 => "faded",
            _ => "still",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}
