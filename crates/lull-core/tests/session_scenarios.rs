use std::time::Duration;

use lull_core::{
    Bucket, ContentLoader, ContentSource, CrossfadeNeutralizer, GazePoint, Mode, Neutralizer,
    NullLoader, PrepareHandle, ProceduralNeutralizer, Session, SessionConfig, Status,
};

const FRAME_MS: u64 = 16;

fn quick_config() -> SessionConfig {
    SessionConfig {
        primary_calibration_secs: 1.0,
        recovery_calibration_secs: 1.0,
        ..Default::default()
    }
}

fn procedural_session() -> Session {
    Session::new(quick_config(), Box::new(ProceduralNeutralizer::default())).unwrap()
}

/// Drives a session with a frame counter
struct Driver {
    session: Session,
    frame: u64,
}

impl Driver {
    fn new(session: Session) -> Self {
        Self { session, frame: 0 }
    }

    fn now(&self) -> Duration {
        Duration::from_millis(self.frame * FRAME_MS)
    }

    fn step(&mut self, gaze: Option<GazePoint>) -> lull_core::Snapshot {
        let snap = self.session.advance(self.now(), gaze);
        self.frame += 1;
        snap
    }

    fn still(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step(Some(GazePoint::CENTER));
        }
    }

    /// Large left/right saccades every frame
    fn restless(&mut self, frames: usize) -> Vec<lull_core::Snapshot> {
        (0..frames)
            .map(|i| {
                let x = if i % 2 == 0 { 0.3 } else { 0.7 };
                self.step(Some(GazePoint::new(x, 0.5)))
            })
            .collect()
    }

    fn calibrate(&mut self) {
        while !self.session.is_calibrated() {
            self.step(Some(GazePoint::CENTER));
        }
    }
}

#[test]
fn test_calibration_suppresses_detection() {
    let mut driver = Driver::new(procedural_session());
    let snaps = driver.restless(40);

    assert!(snaps.iter().all(|s| s.status == Status::Calibrating));
    assert!(snaps.iter().all(|s| !s.spiked));
    assert!(snaps.iter().all(|s| s.level_target == 0.0));
    assert!(snaps.iter().any(|s| s.arousal > 0.5));
}

#[test]
fn test_restless_gaze_spikes_once_after_calibration() {
    let mut driver = Driver::new(procedural_session());
    driver.calibrate();
    driver.still(10);

    let snaps = driver.restless(30);
    let spike_frames: Vec<_> = snaps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.spiked)
        .map(|(i, _)| i)
        .collect();

    // Eighth consecutive raw hit, one spike for the whole sustained burst
    assert_eq!(spike_frames, vec![7]);
    assert_eq!(snaps[29].level_target, 1.0);
    assert!(snaps[29].level > 0.0 && snaps[29].level < 1.0);
    assert_eq!(driver.session.metrics().spikes(), 1);
}

#[test]
fn test_lost_gaze_freezes_level() {
    let mut driver = Driver::new(procedural_session());
    driver.calibrate();
    driver.restless(30);

    let level = driver.session.neutralizer().level();
    let target = driver.session.neutralizer().level_target();
    assert!(level > 0.0);

    for _ in 0..50 {
        let snap = driver.step(None);
        assert_eq!(snap.status, Status::NoSignal);
        assert_eq!(snap.level, level);
        assert_eq!(snap.level_target, target);
        assert_eq!(snap.arousal, 0.0);
    }
}

#[test]
fn test_calm_decays_after_quiet_period() {
    let mut driver = Driver::new(procedural_session());
    driver.calibrate();
    driver.restless(20);
    let peak = driver.session.neutralizer().level_target();

    // Still gaze for well over five seconds
    driver.still(500);
    let after = driver.session.neutralizer().level_target();
    assert!(after < peak);
    assert!(after >= 0.0);
}

#[test]
fn test_recalibration_resets_detection() {
    let mut driver = Driver::new(procedural_session());
    driver.calibrate();
    driver.restless(5);

    driver.session.begin_calibration(0.5).unwrap();
    let snaps = driver.restless(10);
    assert!(snaps.iter().all(|s| s.status == Status::Calibrating));
    assert!(snaps.iter().all(|s| !s.spiked));
}

#[test]
fn test_crossfade_session_without_content_stays_procedural() {
    let neutralizer = CrossfadeNeutralizer::new(Mode::Primary, NullLoader);
    let session = Session::new(quick_config(), Box::new(neutralizer)).unwrap();
    let mut driver = Driver::new(session);

    driver.calibrate();
    driver.restless(60);

    let now = driver.now();
    assert!(driver.session.compose(now).is_procedural_only());
    assert_eq!(driver.session.metrics().spikes(), 1);
}

/// Every bucket's content is ready as soon as it is asked for
struct InstantLoader;

impl ContentLoader for InstantLoader {
    fn prepare(&mut self, bucket: Bucket) -> PrepareHandle {
        PrepareHandle::ready(ContentSource::new(bucket, "instant", "x"))
    }
}

#[test]
fn test_fade_completes_while_gaze_is_lost() {
    let neutralizer = CrossfadeNeutralizer::new(Mode::Primary, InstantLoader);
    let session = Session::new(quick_config(), Box::new(neutralizer)).unwrap();
    let mut driver = Driver::new(session);
    let first = Bucket::MIN;
    let second = Bucket::new(1).unwrap();

    driver.calibrate();
    let mut fading = false;
    for _ in 0..200 {
        driver.restless(1);
        let comp = driver.session.compose(driver.now());
        if comp.content_opacity(first).is_some() && comp.content_opacity(second).is_some() {
            fading = true;
            break;
        }
    }
    assert!(fading, "no crossfade started");

    let level = driver.session.neutralizer().level();
    let target = driver.session.neutralizer().level_target();
    for _ in 0..200 {
        let snap = driver.step(None);
        assert_eq!(snap.status, Status::NoSignal);
        assert_eq!(snap.level, level);
        assert_eq!(snap.level_target, target);
    }

    let comp = driver.session.compose(driver.now());
    assert_eq!(comp.content_opacity(second), Some(1.0));
    assert_eq!(comp.content_opacity(first), None);
}

#[test]
fn test_restart_returns_to_zero() {
    let mut driver = Driver::new(procedural_session());
    driver.calibrate();
    driver.restless(30);

    driver.session.restart().unwrap();
    assert_eq!(driver.session.neutralizer().level(), 0.0);
    assert_eq!(driver.session.neutralizer().level_target(), 0.0);
    assert!(!driver.session.is_calibrated());
}

#[test]
fn test_snapshots_serialize_as_json_lines() {
    let mut driver = Driver::new(procedural_session());
    let snap = driver.step(Some(GazePoint::new(0.2, 0.8)));
    let line = serde_json::to_string(&snap).unwrap();
    assert!(!line.contains('\n'));

    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["status"], "calibrating");
    assert_eq!(value["mode"], "primary");
}
