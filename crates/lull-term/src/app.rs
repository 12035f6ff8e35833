//! Demo application runner

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEvent},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use lull_core::{Session, SessionError, SessionSummary, Snapshot};
use tracing::{info, warn};

use crate::hud::{render_hud, HudFlags, HUD_ROWS};
use crate::paint::{Area, Painter};
use crate::renderer::{RenderBackend, RenderError, TerminalBackend};
use crate::simulator::{DemoCommand, GazeSimulator};

/// Drives a session from the keyboard simulator and paints every refresh
pub struct DemoRunner {
    session: Session,
    simulator: GazeSimulator,
    painter: Painter,
    tick_rate: Duration,
    running: bool,
}

impl DemoRunner {
    pub fn new(session: Session, simulator: GazeSimulator, painter: Painter) -> Self {
        Self {
            session,
            simulator,
            painter,
            tick_rate: Duration::from_millis(16),
            running: true,
        }
    }

    /// Set tick rate
    pub fn with_tick_rate(mut self, rate: Duration) -> Self {
        self.tick_rate = rate;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply one key press to the simulator and the session
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), SessionError> {
        let Some(command) = self.simulator.process_key(key) else {
            return Ok(());
        };

        match command {
            DemoCommand::Moved => {}
            DemoCommand::Quit => self.running = false,
            DemoCommand::ToggleMode => {
                let mode = self.session.mode().toggled();
                self.session.cancel_reset_program();
                self.session.enter_mode(mode)?;
            }
            DemoCommand::Recalibrate => {
                let secs = self.session.config().calibration_secs(self.session.mode());
                self.session.begin_calibration(secs)?;
            }
            DemoCommand::StartResetProgram => self.session.start_default_reset_program()?,
            DemoCommand::Restart => {
                self.simulator.reset();
                self.session.restart()?;
            }
        }
        Ok(())
    }

    /// Advance the session and paint one frame
    pub fn frame(
        &mut self,
        now: Duration,
        backend: &mut dyn RenderBackend,
    ) -> Result<Snapshot, RenderError> {
        let snapshot = self.session.advance(now, self.simulator.sample());

        backend.begin_frame()?;
        let caps = backend.capabilities();
        let area = Area {
            width: caps.width,
            height: caps.height.saturating_sub(HUD_ROWS),
        };
        self.painter
            .paint(&self.session.compose(now), area, backend);

        let flags = HudFlags {
            restless: self.simulator.is_restless(),
            face_lost: self.simulator.is_face_lost(),
        };
        render_hud(&snapshot, self.session.metrics().spikes(), flags, backend);
        backend.end_frame()?;

        Ok(snapshot)
    }

    /// Run until quit, owning the terminal in the meantime
    pub fn run(&mut self, backend: &mut TerminalBackend) -> io::Result<()> {
        // Enter alternate screen and raw mode
        terminal::enable_raw_mode()?;
        enter_screen(&mut io::stdout())?;

        let result = self.event_loop(backend);

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;

        result
    }

    fn event_loop(&mut self, backend: &mut TerminalBackend) -> io::Result<()> {
        let started = Instant::now();
        let mut last_tick = Instant::now();

        while self.running {
            // Poll for events
            let timeout = self
                .tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_default();

            if event::poll(timeout)? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    if let Err(err) = self.handle_key(key) {
                        warn!(%err, "key command rejected");
                    }
                }
            }

            // Check for tick
            if last_tick.elapsed() >= self.tick_rate {
                last_tick = Instant::now();
                self.frame(started.elapsed(), backend)
                    .map_err(|e| io::Error::other(e.to_string()))?;
            }
        }

        info!("demo loop finished");
        Ok(())
    }

    /// Stop the session and return its summary
    pub fn finish(self) -> SessionSummary {
        self.session.stop()
    }
}

/// Switch `out` to the alternate screen; raw mode is left again on failure
fn enter_screen(out: &mut impl Write) -> io::Result<()> {
    if let Err(err) = execute!(out, EnterAlternateScreen) {
        let _ = terminal::disable_raw_mode();
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MemoryBackend;
    use crossterm::event::{KeyCode, KeyModifiers};
    use lull_core::{Mode, ProceduralNeutralizer, SessionConfig, Status};

    fn runner() -> DemoRunner {
        let config = SessionConfig {
            primary_calibration_secs: 0.5,
            recovery_calibration_secs: 0.5,
            ..Default::default()
        };
        let session = Session::new(config, Box::new(ProceduralNeutralizer::default())).unwrap();
        DemoRunner::new(session, GazeSimulator::new(0.05, 0.05, 11), Painter::new(11))
    }

    fn press(runner: &mut DemoRunner, c: char) {
        runner
            .handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()))
            .unwrap();
    }

    struct ClosedTerminal;

    impl Write for ClosedTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_screen_switch_leaves_raw_mode() {
        assert!(enter_screen(&mut ClosedTerminal).is_err());
        assert!(!terminal::is_raw_mode_enabled().unwrap());
    }

    #[test]
    fn test_frames_render_with_hud() {
        let mut runner = runner();
        let mut backend = MemoryBackend::new(160, 20);
        let snap = runner.frame(Duration::ZERO, &mut backend).unwrap();
        assert_eq!(snap.status, Status::Calibrating);
        assert!(backend.presented().row_text(18).contains("CALIBRATING"));
        assert_eq!(backend.frames(), 1);
    }

    #[test]
    fn test_face_loss_key_freezes_pipeline() {
        let mut runner = runner();
        let mut backend = MemoryBackend::new(120, 10);
        press(&mut runner, 'x');
        let snap = runner.frame(Duration::from_millis(16), &mut backend).unwrap();
        assert_eq!(snap.status, Status::NoSignal);
    }

    #[test]
    fn test_mode_key_toggles_and_recalibrates() {
        let mut runner = runner();
        let mut backend = MemoryBackend::new(120, 10);
        for i in 0..60 {
            runner.frame(Duration::from_millis(i * 16), &mut backend).unwrap();
        }
        assert!(runner.session().is_calibrated());

        press(&mut runner, 'm');
        assert_eq!(runner.session().mode(), Mode::Recovery);
        assert!(!runner.session().is_calibrated());
    }

    #[test]
    fn test_reset_program_key() {
        let mut runner = runner();
        press(&mut runner, 'r');
        assert!(runner.session().reset_program_active());
        assert_eq!(runner.session().mode(), Mode::Recovery);

        // Toggling mode abandons the program
        press(&mut runner, 'm');
        assert!(!runner.session().reset_program_active());
        assert_eq!(runner.session().mode(), Mode::Primary);
    }

    #[test]
    fn test_restart_key_starts_over() {
        let mut runner = runner();
        let mut backend = MemoryBackend::new(80, 12);
        press(&mut runner, 'j');
        press(&mut runner, 'x');
        for i in 0..40 {
            runner.frame(Duration::from_millis(i * 16), &mut backend).unwrap();
        }
        assert_eq!(runner.session().metrics().summary().frames, 40);

        press(&mut runner, 'n');
        assert_eq!(runner.session().metrics().summary().frames, 0);
        assert!(!runner.session().is_calibrated());
        let snap = runner.frame(Duration::from_millis(640), &mut backend).unwrap();
        assert_eq!(snap.status, Status::Calibrating);
    }

    #[test]
    fn test_restless_gaze_spikes_in_demo() {
        let mut runner = runner();
        let mut backend = MemoryBackend::new(80, 12);
        for i in 0..40 {
            runner.frame(Duration::from_millis(i * 16), &mut backend).unwrap();
        }
        press(&mut runner, 'j');
        for i in 40..200 {
            runner.frame(Duration::from_millis(i * 16), &mut backend).unwrap();
        }
        assert!(runner.session().metrics().spikes() >= 1);

        press(&mut runner, 'q');
        assert!(!runner.is_running());
        let summary = runner.finish();
        assert_eq!(summary.frames, 200);
    }
}
