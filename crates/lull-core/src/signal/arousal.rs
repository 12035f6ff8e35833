//! Arousal scoring from gaze movement

use serde::{Deserialize, Serialize};

use crate::input::GazePoint;

/// Gaze speed, in screen fractions per second, treated as fully "fast"
pub const VELOCITY_SCALE: f64 = 1.2;

/// Mean per-axis positional variance treated as fully "jittery"
pub const VARIANCE_SCALE: f64 = 0.0025;

const VELOCITY_WEIGHT: f64 = 0.65;
const VARIANCE_WEIGHT: f64 = 0.35;

/// Bounded arousal index with its two normalized components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArousalSample {
    /// Weighted index in [0,1]
    pub arousal: f64,
    /// Normalized gaze velocity in [0,1]
    pub velocity: f64,
    /// Normalized positional variance in [0,1]
    pub variance: f64,
}

/// Score one frame.
///
/// Pure: identical inputs always produce identical output. A non-positive
/// `elapsed_secs` (first frame, stalled clock) yields zero velocity.
pub fn score(
    current: GazePoint,
    previous: GazePoint,
    elapsed_secs: f64,
    variance_x: f64,
    variance_y: f64,
) -> ArousalSample {
    let speed = if elapsed_secs > 0.0 {
        current.distance(&previous) / elapsed_secs
    } else {
        0.0
    };

    let velocity = clamp01(speed / VELOCITY_SCALE);
    let variance = clamp01(((variance_x + variance_y) / 2.0) / VARIANCE_SCALE);
    let arousal = clamp01(velocity * VELOCITY_WEIGHT + variance * VARIANCE_WEIGHT);

    ArousalSample {
        arousal,
        velocity,
        variance,
    }
}

fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
