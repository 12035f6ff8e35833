//! Errors raised at the session's call boundary.
//!
//! Runtime conditions (lost gaze, collapsed baseline, unready content) are
//! absorbed by the pipeline and never show up here; only programmer errors do.

use crate::mode::ModeParseError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Calibration duration must be a positive number of seconds, got {0}")]
    InvalidCalibration(f64),

    #[error("Reset program length must be a positive number of minutes, got {0}")]
    InvalidProgramLength(f64),

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Mode(#[from] ModeParseError),
}
