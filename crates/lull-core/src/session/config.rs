use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::mode::Mode;
use crate::signal::{DEFAULT_BASELINE_EPSILON, DEFAULT_HIT_CAP, HIT_THRESHOLD};

/// Tunables for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Samples kept per gaze axis for positional variance
    pub gaze_window: usize,
    /// Arousal samples behind the baseline mean
    pub baseline_window: usize,
    pub baseline_epsilon: f64,
    /// Net raw hits needed for a debounced spike
    pub hit_threshold: u32,
    /// Saturation point of the hit counter
    pub hit_cap: u32,
    pub primary_calibration_secs: f64,
    pub recovery_calibration_secs: f64,
    pub reset_program_minutes: f64,
    /// Mode the session starts in
    pub mode: Mode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gaze_window: 180,
            baseline_window: 600,
            baseline_epsilon: DEFAULT_BASELINE_EPSILON,
            hit_threshold: HIT_THRESHOLD,
            hit_cap: DEFAULT_HIT_CAP,
            primary_calibration_secs: Mode::Primary.default_calibration_secs(),
            recovery_calibration_secs: Mode::Recovery.default_calibration_secs(),
            reset_program_minutes: 10.0,
            mode: Mode::Primary,
        }
    }
}

impl SessionConfig {
    /// Calibration length used when entering `mode`
    pub fn calibration_secs(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Primary => self.primary_calibration_secs,
            Mode::Recovery => self.recovery_calibration_secs,
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.gaze_window == 0 {
            return Err(SessionError::InvalidConfig(
                "gaze_window must be at least 1".to_string(),
            ));
        }
        if self.baseline_window == 0 {
            return Err(SessionError::InvalidConfig(
                "baseline_window must be at least 1".to_string(),
            ));
        }
        if !(self.baseline_epsilon.is_finite() && self.baseline_epsilon > 0.0) {
            return Err(SessionError::InvalidConfig(format!(
                "baseline_epsilon must be positive, got {}",
                self.baseline_epsilon
            )));
        }
        if self.hit_threshold == 0 {
            return Err(SessionError::InvalidConfig(
                "hit_threshold must be at least 1".to_string(),
            ));
        }
        if self.hit_cap < self.hit_threshold {
            return Err(SessionError::InvalidConfig(format!(
                "hit_cap ({}) must not be below hit_threshold ({})",
                self.hit_cap, self.hit_threshold
            )));
        }
        for secs in [self.primary_calibration_secs, self.recovery_calibration_secs] {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(SessionError::InvalidCalibration(secs));
            }
        }
        if !(self.reset_program_minutes.is_finite() && self.reset_program_minutes > 0.0) {
            return Err(SessionError::InvalidProgramLength(self.reset_program_minutes));
        }
        Ok(())
    }
}
