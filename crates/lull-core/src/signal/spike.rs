//! Debounced spike detection

use crate::mode::Mode;

/// Net consecutive raw hits needed before the debounced signal goes high
pub const HIT_THRESHOLD: u32 = 8;

/// Default saturation point of the hit counter
pub const DEFAULT_HIT_CAP: u32 = HIT_THRESHOLD * 2;

/// What the detector emitted for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpikeSignal {
    /// Debounced signal rose on this frame; counts as exactly one spike
    Spike,
    /// Debounced signal is still high; nothing to report
    Held,
    /// Debounced signal is low
    Calm,
}

/// Hysteresis filter over the raw "arousal above baseline" condition.
///
/// A single saturating counter climbs on raw hits and falls on misses; the
/// debounced state is `counter >= threshold` and only its rising edge emits
/// a spike.
#[derive(Debug, Clone)]
pub struct SpikeDetector {
    hits: u32,
    debounced: bool,
    threshold: u32,
    cap: u32,
}

impl Default for SpikeDetector {
    fn default() -> Self {
        Self::new(HIT_THRESHOLD, DEFAULT_HIT_CAP)
    }
}

impl SpikeDetector {
    /// `cap` is raised to `threshold` if smaller
    pub fn new(threshold: u32, cap: u32) -> Self {
        let threshold = threshold.max(1);
        Self {
            hits: 0,
            debounced: false,
            threshold,
            cap: cap.max(threshold),
        }
    }

    /// Evaluate one frame against an already floored baseline
    pub fn update(&mut self, arousal: f64, baseline: f64, mode: Mode) -> SpikeSignal {
        self.observe(arousal > baseline * mode.spike_multiplier())
    }

    /// Feed one raw hit/miss
    pub fn observe(&mut self, raw_hit: bool) -> SpikeSignal {
        self.hits = if raw_hit {
            (self.hits + 1).min(self.cap)
        } else {
            self.hits.saturating_sub(1)
        };

        let was_high = self.debounced;
        self.debounced = self.hits >= self.threshold;

        match (was_high, self.debounced) {
            (false, true) => SpikeSignal::Spike,
            (true, true) => SpikeSignal::Held,
            (_, false) => SpikeSignal::Calm,
        }
    }

    pub fn reset(&mut self) {
        self.hits = 0;
        self.debounced = false;
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn is_debounced(&self) -> bool {
        self.debounced
    }
}
