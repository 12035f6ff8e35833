//! Normalized gaze points

use serde::{Deserialize, Serialize};

/// Screen-space gaze position, normalized to [0,1] on both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}

impl GazePoint {
    /// Centre of the screen, used before the first real point arrives
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Create a point, clamping both coordinates into [0,1]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    /// Euclidean distance in screen fractions
    pub fn distance(&self, other: &GazePoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for GazePoint {
    fn default() -> Self {
        Self::CENTER
    }
}

impl From<(f64, f64)> for GazePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let p = GazePoint::new(-0.2, 1.7);
        assert_eq!(p, GazePoint { x: 0.0, y: 1.0 });
    }

    #[test]
    fn test_distance() {
        let a = GazePoint::new(0.0, 0.0);
        let b = GazePoint::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-12);
    }
}
