//! Baseline tracking and timed calibration

use std::time::Duration;

use tracing::debug;

use crate::stats::RollingWindowStats;

/// Floor applied to the baseline mean so comparisons never degenerate
pub const DEFAULT_BASELINE_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Requested; the deadline is fixed on the next frame
    Armed { duration: Duration },
    Active { deadline: Duration },
    Complete,
}

/// Result of recording one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationProgress {
    /// Still warming up; detection must stay suppressed
    Calibrating { remaining: Duration },
    /// The deadline passed on this frame; reported exactly once
    JustCompleted,
    /// Normal operation
    Calibrated,
}

/// Trailing mean of the arousal index.
///
/// Samples are recorded both during and after calibration, so the baseline
/// keeps drifting with the viewer over the whole session.
#[derive(Debug, Clone)]
pub struct BaselineTracker {
    window: RollingWindowStats,
    epsilon: f64,
    phase: Phase,
}

impl BaselineTracker {
    /// Create a tracker that starts out calibrated with an empty window.
    /// Call [`begin_calibration`](Self::begin_calibration) to warm it up.
    pub fn new(capacity: usize, epsilon: f64) -> Self {
        Self {
            window: RollingWindowStats::new(capacity),
            epsilon,
            phase: Phase::Complete,
        }
    }

    /// Clear the window and start a new calibration phase.
    ///
    /// Calling this again before the phase ends restarts it.
    pub fn begin_calibration(&mut self, duration: Duration) {
        self.window.reset();
        self.phase = Phase::Armed { duration };
    }

    /// Fix a pending deadline relative to the current frame
    pub fn arm(&mut self, now: Duration) {
        if let Phase::Armed { duration } = self.phase {
            let deadline = now.saturating_add(duration);
            debug!(deadline_ms = deadline.as_millis() as u64, "calibration armed");
            self.phase = Phase::Active { deadline };
        }
    }

    /// Record an arousal value and report where calibration stands
    pub fn record(&mut self, arousal: f64, now: Duration) -> CalibrationProgress {
        self.arm(now);
        self.window.push(arousal);

        match self.phase {
            Phase::Active { deadline } if now >= deadline => {
                self.phase = Phase::Complete;
                CalibrationProgress::JustCompleted
            }
            Phase::Active { deadline } => CalibrationProgress::Calibrating {
                remaining: deadline.saturating_sub(now),
            },
            Phase::Armed { duration } => CalibrationProgress::Calibrating { remaining: duration },
            Phase::Complete => CalibrationProgress::Calibrated,
        }
    }

    /// Reference value for spike detection, floored at epsilon
    pub fn baseline(&self) -> f64 {
        self.window.mean().max(self.epsilon)
    }

    pub fn is_calibrated(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Time left in the current calibration phase, if one is running
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        match self.phase {
            Phase::Armed { duration } => Some(duration),
            Phase::Active { deadline } => Some(deadline.saturating_sub(now)),
            Phase::Complete => None,
        }
    }

    pub fn samples(&self) -> usize {
        self.window.len()
    }
}
