//! Deterministic synthetic gaze traces
//!
//! Alternates calm fixation with restless scanning so a replay exercises
//! calibration, spikes and decay without a tracker attached.

use std::time::Duration;

use lull_core::GazePoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::trace::TraceFrame;

/// Shape of a generated trace
#[derive(Debug, Clone, PartialEq)]
pub struct SynthSpec {
    pub seed: u64,
    pub duration: Duration,
    pub frame: Duration,
    /// Length of each calm stretch; the trace opens with one
    pub calm: Duration,
    /// Length of each restless stretch
    pub restless: Duration,
    /// Per-frame probability of losing the face
    pub dropout: f64,
}

impl Default for SynthSpec {
    fn default() -> Self {
        Self {
            seed: 7,
            duration: Duration::from_secs(60),
            frame: Duration::from_millis(16),
            calm: Duration::from_secs(15),
            restless: Duration::from_secs(5),
            dropout: 0.0,
        }
    }
}

impl SynthSpec {
    fn is_restless(&self, at: Duration) -> bool {
        let cycle = self.calm + self.restless;
        if cycle.is_zero() {
            return false;
        }
        let offset = at.as_nanos() % cycle.as_nanos();
        offset >= self.calm.as_nanos()
    }
}

/// Generate a trace; equal `SynthSpec`s yield equal frames
pub fn generate(spec: &SynthSpec) -> Vec<TraceFrame> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let frame = if spec.frame.is_zero() {
        Duration::from_millis(16)
    } else {
        spec.frame
    };
    let dropout = spec.dropout.clamp(0.0, 1.0);

    let mut frames = Vec::new();
    let mut fixation = GazePoint::CENTER;
    let mut gaze = GazePoint::CENTER;
    let mut at = Duration::ZERO;

    while at < spec.duration {
        if spec.is_restless(at) {
            // Saccade to a fresh spot now and then, otherwise scan nearby
            if rng.gen_bool(0.1) {
                gaze = GazePoint::new(rng.gen_range(0.1..0.9), rng.gen_range(0.1..0.9));
            } else {
                gaze = GazePoint::new(
                    gaze.x + rng.gen_range(-0.06..0.06),
                    gaze.y + rng.gen_range(-0.06..0.06),
                );
            }
            fixation = gaze;
        } else {
            // Slow drift of the fixation plus tremor around it
            fixation = GazePoint::new(
                fixation.x + rng.gen_range(-0.0004..0.0004),
                fixation.y + rng.gen_range(-0.0004..0.0004),
            );
            gaze = GazePoint::new(
                fixation.x + rng.gen_range(-0.001..0.001),
                fixation.y + rng.gen_range(-0.001..0.001),
            );
        }

        let sample = if dropout > 0.0 && rng.gen_bool(dropout) {
            None
        } else {
            Some(gaze)
        };
        frames.push(TraceFrame { at, gaze: sample });
        at += frame;
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short() -> SynthSpec {
        SynthSpec {
            duration: Duration::from_secs(4),
            calm: Duration::from_secs(2),
            restless: Duration::from_secs(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_trace() {
        assert_eq!(generate(&short()), generate(&short()));

        let other = SynthSpec {
            seed: 8,
            ..short()
        };
        assert_ne!(generate(&short()), generate(&other));
    }

    #[test]
    fn test_frame_count_and_spacing() {
        let frames = generate(&short());
        assert_eq!(frames.len(), 250);
        assert_eq!(frames[1].at - frames[0].at, Duration::from_millis(16));
        assert!(frames.iter().all(|f| f.gaze.is_some()));
    }

    #[test]
    fn test_restless_moves_more_than_calm() {
        let frames = generate(&short());
        let travel = |range: std::ops::Range<usize>| -> f64 {
            frames[range]
                .windows(2)
                .map(|w| w[0].gaze.unwrap().distance(&w[1].gaze.unwrap()))
                .sum()
        };
        // Frames 0..125 are calm, 125..187 restless
        let calm = travel(0..60);
        let restless = travel(126..186);
        assert!(restless > calm * 10.0, "calm {calm}, restless {restless}");
    }

    #[test]
    fn test_full_dropout_loses_every_frame() {
        let spec = SynthSpec {
            dropout: 1.0,
            ..short()
        };
        assert!(generate(&spec).iter().all(|f| f.gaze.is_none()));
    }
}
