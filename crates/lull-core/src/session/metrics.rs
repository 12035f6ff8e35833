use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mode::Mode;

use super::{Snapshot, Status};

/// Running totals accumulated from snapshots
#[derive(Debug, Clone)]
pub struct SessionMetrics {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    origin: Option<Duration>,
    last_at: Duration,
    frames: u64,
    scored_frames: u64,
    no_signal_frames: u64,
    spikes: u32,
    first_spike: Option<Duration>,
    arousal_sum: f64,
    max_level: f64,
    mode: Mode,
}

impl SessionMetrics {
    pub fn new(mode: Mode) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            origin: None,
            last_at: Duration::ZERO,
            frames: 0,
            scored_frames: 0,
            no_signal_frames: 0,
            spikes: 0,
            first_spike: None,
            arousal_sum: 0.0,
            max_level: 0.0,
            mode,
        }
    }

    /// Fold one frame in. Spikes count once per debounced rising edge.
    pub fn record(&mut self, snapshot: &Snapshot) {
        let origin = *self.origin.get_or_insert(snapshot.at);
        self.last_at = snapshot.at;
        self.frames += 1;
        self.mode = snapshot.mode;
        self.max_level = self.max_level.max(snapshot.level);

        if snapshot.status == Status::NoSignal {
            self.no_signal_frames += 1;
            return;
        }

        self.scored_frames += 1;
        self.arousal_sum += snapshot.arousal;

        if snapshot.spiked {
            self.spikes += 1;
            if self.first_spike.is_none() {
                self.first_spike = Some(snapshot.at.saturating_sub(origin));
            }
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn spikes(&self) -> u32 {
        self.spikes
    }

    /// Offset of the first spike from the first frame
    pub fn first_spike(&self) -> Option<Duration> {
        self.first_spike
    }

    /// Mean arousal over scored frames, 0 before any
    pub fn mean_arousal(&self) -> f64 {
        if self.scored_frames == 0 {
            0.0
        } else {
            self.arousal_sum / self.scored_frames as f64
        }
    }

    pub fn max_level(&self) -> f64 {
        self.max_level
    }

    pub fn elapsed(&self) -> Duration {
        self.origin
            .map_or(Duration::ZERO, |origin| self.last_at.saturating_sub(origin))
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id,
            started_at: self.started_at,
            duration_ms: self.elapsed().as_millis() as u64,
            frames: self.frames,
            scored_frames: self.scored_frames,
            no_signal_frames: self.no_signal_frames,
            spikes: self.spikes,
            first_spike_ms: self.first_spike.map(|d| d.as_millis() as u64),
            mean_arousal: self.mean_arousal(),
            max_level: self.max_level,
            final_mode: self.mode,
        }
    }
}

/// End-of-session digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub frames: u64,
    pub scored_frames: u64,
    pub no_signal_frames: u64,
    pub spikes: u32,
    pub first_spike_ms: Option<u64>,
    pub mean_arousal: f64,
    pub max_level: f64,
    pub final_mode: Mode,
}
