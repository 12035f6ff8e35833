//! Session object and per-frame driver
//!
//! A [`Session`] owns every pipeline component and is advanced once per
//! display refresh with the current gaze point (or none). It has no clock of
//! its own: all timing comes from the `now` the caller passes in.

mod config;
mod metrics;
mod snapshot;

pub use config::SessionConfig;
pub use metrics::{SessionMetrics, SessionSummary};
pub use snapshot::{Snapshot, Status};

use std::time::Duration;

use tracing::{debug, info};

use crate::error::SessionError;
use crate::input::{GazePoint, GazeSample};
use crate::mode::Mode;
use crate::neutralizer::Neutralizer;
use crate::presenter::Composition;
use crate::signal::{
    score, ArousalSample, BaselineTracker, CalibrationProgress, SpikeDetector, SpikeSignal,
};
use crate::stats::RollingWindowStats;

/// Timed stretch in Recovery mode that hands back to Primary when it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResetProgram {
    Armed { length: Duration },
    Active { deadline: Duration },
}

impl ResetProgram {
    fn arm(&mut self, now: Duration) {
        if let ResetProgram::Armed { length } = *self {
            *self = ResetProgram::Active {
                deadline: now.saturating_add(length),
            };
        }
    }

    fn remaining(&self, now: Duration) -> Duration {
        match *self {
            ResetProgram::Armed { length } => length,
            ResetProgram::Active { deadline } => deadline.saturating_sub(now),
        }
    }
}

/// One biofeedback session
pub struct Session {
    config: SessionConfig,
    neutralizer: Box<dyn Neutralizer>,
    gaze_x: RollingWindowStats,
    gaze_y: RollingWindowStats,
    baseline: BaselineTracker,
    detector: SpikeDetector,
    mode: Mode,
    previous: GazePoint,
    last_frame: Option<Duration>,
    program: Option<ResetProgram>,
    metrics: SessionMetrics,
}

impl Session {
    /// Validate `config` and start calibrating in the configured mode
    pub fn new(
        config: SessionConfig,
        mut neutralizer: Box<dyn Neutralizer>,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let mode = config.mode;
        neutralizer.set_mode(mode);

        let mut session = Self {
            gaze_x: RollingWindowStats::new(config.gaze_window),
            gaze_y: RollingWindowStats::new(config.gaze_window),
            baseline: BaselineTracker::new(config.baseline_window, config.baseline_epsilon),
            detector: SpikeDetector::new(config.hit_threshold, config.hit_cap),
            mode,
            previous: GazePoint::CENTER,
            last_frame: None,
            program: None,
            metrics: SessionMetrics::new(mode),
            neutralizer,
            config,
        };
        session.begin_calibration(session.config.calibration_secs(mode))?;

        info!(
            session_id = %session.metrics.session_id(),
            mode = %mode,
            variant = ?session.neutralizer.variant(),
            "session started"
        );
        Ok(session)
    }

    /// Process one refresh
    pub fn advance(&mut self, now: Duration, gaze: GazeSample) -> Snapshot {
        let elapsed = self
            .last_frame
            .map_or(0.0, |last| now.saturating_sub(last).as_secs_f64());
        self.last_frame = Some(now);

        self.tick_program(now);
        self.baseline.arm(now);

        let mut sample = ArousalSample::default();
        let mut spiked = false;

        let status = match gaze {
            None => Status::NoSignal,
            Some(point) => {
                self.gaze_x.push(point.x);
                self.gaze_y.push(point.y);
                sample = score(
                    point,
                    self.previous,
                    elapsed,
                    self.gaze_x.variance(),
                    self.gaze_y.variance(),
                );
                self.previous = point;

                let status = match self.baseline.record(sample.arousal, now) {
                    CalibrationProgress::Calibrating { .. } => Status::Calibrating,
                    CalibrationProgress::JustCompleted => {
                        info!(
                            baseline = self.baseline.baseline(),
                            samples = self.baseline.samples(),
                            "calibration complete"
                        );
                        Status::Calibrated
                    }
                    CalibrationProgress::Calibrated => {
                        match self
                            .detector
                            .update(sample.arousal, self.baseline.baseline(), self.mode)
                        {
                            SpikeSignal::Spike => {
                                spiked = true;
                                let accepted = self.neutralizer.on_spike(now);
                                debug!(
                                    arousal = sample.arousal,
                                    baseline = self.baseline.baseline(),
                                    accepted,
                                    "spike"
                                );
                            }
                            SpikeSignal::Held => {}
                            SpikeSignal::Calm => self.neutralizer.on_calm(now),
                        }
                        Status::Running
                    }
                };

                self.neutralizer.advance(now);
                status
            }
        };
        self.neutralizer.refresh(now);

        let snapshot = Snapshot {
            at: now,
            arousal: sample.arousal,
            velocity: sample.velocity,
            variance: sample.variance,
            baseline: self.baseline.baseline(),
            level: self.neutralizer.level(),
            level_target: self.neutralizer.level_target(),
            bucket: self.neutralizer.bucket(),
            mode: self.mode,
            status,
            spiked,
            calibration_remaining: self.baseline.remaining(now),
            program_remaining: self.program.map(|p| p.remaining(now)),
        };
        self.metrics.record(&snapshot);
        snapshot
    }

    /// Restart calibration for `secs` seconds.
    ///
    /// Clears the baseline window and the spike counter; the deadline is
    /// fixed on the next frame.
    pub fn begin_calibration(&mut self, secs: f64) -> Result<(), SessionError> {
        let duration = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or(SessionError::InvalidCalibration(secs))?;

        self.baseline.begin_calibration(duration);
        self.detector.reset();
        debug!(secs, "calibration requested");
        Ok(())
    }

    /// Change mode for all subsequent frames; the level is left as is
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            info!(from = %self.mode, to = %mode, "mode changed");
        }
        self.mode = mode;
        self.neutralizer.set_mode(mode);
    }

    /// Change mode and recalibrate with that mode's configured duration
    pub fn enter_mode(&mut self, mode: Mode) -> Result<(), SessionError> {
        self.set_mode(mode);
        self.begin_calibration(self.config.calibration_secs(mode))
    }

    /// Switch to Recovery for `minutes`, then back to Primary
    pub fn start_reset_program(&mut self, minutes: f64) -> Result<(), SessionError> {
        let length = Duration::try_from_secs_f64(minutes * 60.0)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or(SessionError::InvalidProgramLength(minutes))?;

        self.enter_mode(Mode::Recovery)?;
        self.program = Some(ResetProgram::Armed { length });
        info!(minutes, "reset program started");
        Ok(())
    }

    /// Reset program with the configured length
    pub fn start_default_reset_program(&mut self) -> Result<(), SessionError> {
        self.start_reset_program(self.config.reset_program_minutes)
    }

    /// Abandon a running reset program, staying in the current mode
    pub fn cancel_reset_program(&mut self) {
        if self.program.take().is_some() {
            info!("reset program cancelled");
        }
    }

    pub fn reset_program_active(&self) -> bool {
        self.program.is_some()
    }

    /// Start over: levels to 0, statistics cleared, recalibration armed
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.neutralizer.reset();
        self.gaze_x.reset();
        self.gaze_y.reset();
        self.previous = GazePoint::CENTER;
        self.last_frame = None;
        self.program = None;
        self.metrics = SessionMetrics::new(self.mode);
        self.begin_calibration(self.config.calibration_secs(self.mode))?;
        info!(session_id = %self.metrics.session_id(), "session restarted");
        Ok(())
    }

    /// End the session and hand back its summary
    pub fn stop(self) -> SessionSummary {
        let summary = self.metrics.summary();
        info!(
            session_id = %summary.session_id,
            spikes = summary.spikes,
            frames = summary.frames,
            "session stopped"
        );
        summary
    }

    /// Layers to paint for this refresh
    pub fn compose(&self, now: Duration) -> Composition {
        self.neutralizer.compose(now)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_calibrated()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn neutralizer(&self) -> &dyn Neutralizer {
        self.neutralizer.as_ref()
    }

    fn tick_program(&mut self, now: Duration) {
        let Some(program) = self.program.as_mut() else {
            return;
        };
        program.arm(now);

        if program.remaining(now).is_zero() {
            self.program = None;
            info!("reset program finished");
            if let Err(err) = self.enter_mode(Mode::Primary) {
                // Config was validated at construction
                debug!(%err, "recalibration after reset program failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neutralizer::ProceduralNeutralizer;

    fn session(config: SessionConfig) -> Session {
        Session::new(config, Box::new(ProceduralNeutralizer::default())).unwrap()
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SessionConfig {
            gaze_window: 0,
            ..Default::default()
        };
        let result = Session::new(config, Box::new(ProceduralNeutralizer::default()));
        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_begin_calibration_rejects_bad_durations() {
        let mut s = session(SessionConfig::default());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                s.begin_calibration(bad),
                Err(SessionError::InvalidCalibration(_))
            ));
        }
        assert!(s.start_reset_program(0.0).is_err());
    }

    #[test]
    fn test_starts_calibrating_with_mode_default() {
        let mut s = session(SessionConfig::default());
        let snap = s.advance(ms(1000), Some(GazePoint::CENTER));
        assert_eq!(snap.status, Status::Calibrating);
        assert_eq!(snap.calibration_remaining, Some(Duration::from_secs(10)));
        assert!(!s.is_calibrated());
    }

    #[test]
    fn test_completion_frame_reported_once() {
        let mut s = session(SessionConfig::default());
        s.begin_calibration(1.0).unwrap();

        let mut statuses = Vec::new();
        for i in 0..=70 {
            let snap = s.advance(ms(i * 16), Some(GazePoint::CENTER));
            statuses.push(snap.status);
        }

        let completed: Vec<_> = statuses
            .iter()
            .enumerate()
            .filter(|(_, st)| **st == Status::Calibrated)
            .map(|(i, _)| i)
            .collect();
        // 63 * 16 = 1008 is the first frame at or past the 1000 ms deadline
        assert_eq!(completed, vec![63]);
        assert!(statuses[64..].iter().all(|st| *st == Status::Running));
    }

    #[test]
    fn test_mode_change_leaves_level() {
        let mut s = session(SessionConfig::default());
        s.set_mode(Mode::Recovery);
        assert_eq!(s.mode(), Mode::Recovery);
        assert_eq!(s.neutralizer().mode(), Mode::Recovery);
        assert_eq!(s.neutralizer().level(), 0.0);
    }

    #[test]
    fn test_reset_program_returns_to_primary() {
        let mut s = session(SessionConfig::default());
        s.start_reset_program(0.5).unwrap();
        assert_eq!(s.mode(), Mode::Recovery);

        let snap = s.advance(ms(1000), Some(GazePoint::CENTER));
        assert_eq!(snap.program_remaining, Some(Duration::from_secs(30)));
        assert_eq!(snap.calibration_remaining, Some(Duration::from_secs(8)));

        let snap = s.advance(ms(31_000), Some(GazePoint::CENTER));
        assert_eq!(snap.mode, Mode::Primary);
        assert_eq!(snap.program_remaining, None);
        assert_eq!(snap.status, Status::Calibrating);
        assert_eq!(snap.calibration_remaining, Some(Duration::from_secs(10)));
        assert!(!s.reset_program_active());
    }

    #[test]
    fn test_cancel_reset_program_keeps_mode() {
        let mut s = session(SessionConfig::default());
        s.start_default_reset_program().unwrap();
        s.cancel_reset_program();
        assert!(!s.reset_program_active());
        assert_eq!(s.mode(), Mode::Recovery);
    }

    #[test]
    fn test_restart_clears_metrics() {
        let mut s = session(SessionConfig::default());
        for i in 0..10 {
            s.advance(ms(i * 16), None);
        }
        let before = s.metrics().session_id();
        s.restart().unwrap();
        assert_ne!(s.metrics().session_id(), before);
        assert_eq!(s.metrics().summary().frames, 0);
        assert!(!s.is_calibrated());
    }

    #[test]
    fn test_stop_returns_summary() {
        let mut s = session(SessionConfig::default());
        s.advance(ms(0), Some(GazePoint::CENTER));
        s.advance(ms(16), None);
        let summary = s.stop();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.no_signal_frames, 1);
    }
}
