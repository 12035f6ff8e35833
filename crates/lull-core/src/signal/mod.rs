//! Per-frame signal path: score, baseline, detect
//!
//! ```text
//! gaze ──► score() ──► BaselineTracker ──► SpikeDetector ──► spike / calm
//! ```

mod arousal;
mod baseline;
mod spike;

pub use arousal::{score, ArousalSample, VARIANCE_SCALE, VELOCITY_SCALE};
pub use baseline::{BaselineTracker, CalibrationProgress, DEFAULT_BASELINE_EPSILON};
pub use spike::{SpikeDetector, SpikeSignal, DEFAULT_HIT_CAP, HIT_THRESHOLD};
