use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::mode::Mode;
use crate::presenter::Bucket;

/// Per-frame pipeline status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Baseline is warming up, detection suppressed
    Calibrating,
    /// Calibration finished on this frame
    Calibrated,
    /// Normal detection
    Running,
    /// No gaze this frame; nothing was scored
    NoSignal,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Calibrating => "CALIBRATING",
            Status::Calibrated => "CALIBRATED",
            Status::Running => "RUNNING",
            Status::NoSignal => "NO SIGNAL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What one call to [`Session::advance`](super::Session::advance) produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(rename = "at_ms", serialize_with = "as_millis")]
    pub at: Duration,
    pub arousal: f64,
    pub velocity: f64,
    pub variance: f64,
    pub baseline: f64,
    pub level: f64,
    pub level_target: f64,
    pub bucket: Bucket,
    pub mode: Mode,
    pub status: Status,
    /// A debounced rising edge happened on this frame
    pub spiked: bool,
    #[serde(rename = "calibration_remaining_ms", serialize_with = "opt_as_millis")]
    pub calibration_remaining: Option<Duration>,
    #[serde(rename = "program_remaining_ms", serialize_with = "opt_as_millis")]
    pub program_remaining: Option<Duration>,
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

fn opt_as_millis<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&(d.as_millis() as u64)),
        None => s.serialize_none(),
    }
}
