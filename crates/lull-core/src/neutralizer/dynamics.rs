//! Level dynamics shared by every neutralizer variant

use std::time::Duration;

use crate::mode::Mode;

/// Upper bound of level and level target
pub const LEVEL_MAX: f64 = 4.0;

/// Quiet time after the last spike before the target starts decaying
pub const CALM_GRACE: Duration = Duration::from_secs(5);

/// Event-driven level target plus its exponentially smoothed follower.
///
/// Both values are clamped to `[0, LEVEL_MAX]` on every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDynamics {
    level: f64,
    target: f64,
    mode: Mode,
    last_spike: Option<Duration>,
}

impl LevelDynamics {
    pub fn new(mode: Mode) -> Self {
        Self {
            level: 0.0,
            target: 0.0,
            mode,
            last_spike: None,
        }
    }

    /// Raise the target by the mode's increment
    pub fn on_spike(&mut self, now: Duration) {
        self.target = clamp_level(self.target + self.mode.spike_increment());
        self.last_spike = Some(now);
    }

    /// Decay the target, but only after [`CALM_GRACE`] without spikes
    pub fn on_calm(&mut self, now: Duration) {
        let quiet = self
            .last_spike
            .map_or(true, |at| now.saturating_sub(at) > CALM_GRACE);
        if quiet {
            self.target = clamp_level(self.target - self.mode.decay_rate());
        }
    }

    /// One smoothing step of the level toward the target
    pub fn advance(&mut self) {
        self.level = clamp_level(self.level + (self.target - self.level) * self.mode.follow_rate());
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Time since the last recorded spike
    pub fn since_last_spike(&self, now: Duration) -> Option<Duration> {
        self.last_spike.map(|at| now.saturating_sub(at))
    }

    /// Back to zero, keeping the mode
    pub fn reset(&mut self) {
        *self = Self::new(self.mode);
    }

    #[cfg(test)]
    pub(crate) fn with_levels(mode: Mode, level: f64, target: f64) -> Self {
        Self {
            level: clamp_level(level),
            target: clamp_level(target),
            mode,
            last_spike: None,
        }
    }
}

fn clamp_level(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, LEVEL_MAX)
    }
}
