//! Keyboard gaze simulator
//!
//! Stands in for a face/eye tracker: arrow keys move the gaze, and two
//! toggles simulate restless eyes and losing the face entirely.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lull_core::{GazePoint, GazeSample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What a key press asked the demo to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    /// Gaze or simulator flags changed; nothing else to do
    Moved,
    ToggleMode,
    Recalibrate,
    StartResetProgram,
    Restart,
    Quit,
}

/// Simulates a gaze source from the keyboard
pub struct GazeSimulator {
    x: f64,
    y: f64,
    step: f64,
    jitter: f64,
    restless: bool,
    face_lost: bool,
    rng: StdRng,
}

impl GazeSimulator {
    pub fn new(step: f64, jitter: f64, seed: u64) -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            step,
            jitter,
            restless: false,
            face_lost: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Process a keyboard event
    pub fn process_key(&mut self, key: KeyEvent) -> Option<DemoCommand> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(DemoCommand::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(DemoCommand::Quit)
            }
            KeyCode::Esc => Some(DemoCommand::Quit),

            // Arrow keys: Move gaze
            KeyCode::Up => {
                self.y = (self.y - self.step).max(0.0);
                Some(DemoCommand::Moved)
            }
            KeyCode::Down => {
                self.y = (self.y + self.step).min(1.0);
                Some(DemoCommand::Moved)
            }
            KeyCode::Left => {
                self.x = (self.x - self.step).max(0.0);
                Some(DemoCommand::Moved)
            }
            KeyCode::Right => {
                self.x = (self.x + self.step).min(1.0);
                Some(DemoCommand::Moved)
            }

            KeyCode::Char('j') | KeyCode::Char('J') => {
                self.restless = !self.restless;
                Some(DemoCommand::Moved)
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.face_lost = !self.face_lost;
                Some(DemoCommand::Moved)
            }

            KeyCode::Char('m') | KeyCode::Char('M') => Some(DemoCommand::ToggleMode),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(DemoCommand::Recalibrate),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(DemoCommand::StartResetProgram),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(DemoCommand::Restart),

            _ => None,
        }
    }

    /// Gaze for the current frame
    pub fn sample(&mut self) -> GazeSample {
        if self.face_lost {
            return None;
        }
        if self.restless && self.jitter > 0.0 {
            let dx = self.rng.gen_range(-self.jitter..=self.jitter);
            let dy = self.rng.gen_range(-self.jitter..=self.jitter);
            return Some(GazePoint::new(self.x + dx, self.y + dy));
        }
        Some(GazePoint::new(self.x, self.y))
    }

    /// Get current gaze screen position
    pub fn gaze_position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn is_restless(&self) -> bool {
        self.restless
    }

    pub fn is_face_lost(&self) -> bool {
        self.face_lost
    }

    /// Back to a centred, steady, visible gaze
    pub fn reset(&mut self) {
        self.x = 0.5;
        self.y = 0.5;
        self.restless = false;
        self.face_lost = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_gaze_movement() {
        let mut sim = GazeSimulator::new(0.05, 0.02, 1);
        assert_eq!(sim.process_key(press(KeyCode::Up)), Some(DemoCommand::Moved));
        let (_, y) = sim.gaze_position();
        assert!(y < 0.5); // Moved up

        for _ in 0..40 {
            sim.process_key(press(KeyCode::Right));
        }
        assert_eq!(sim.gaze_position().0, 1.0);
    }

    #[test]
    fn test_face_loss_yields_no_sample() {
        let mut sim = GazeSimulator::new(0.05, 0.02, 1);
        sim.process_key(press(KeyCode::Char('x')));
        assert!(sim.is_face_lost());
        assert_eq!(sim.sample(), None);

        sim.process_key(press(KeyCode::Char('x')));
        assert_eq!(sim.sample(), Some(GazePoint::CENTER));
    }

    #[test]
    fn test_restless_jitter_stays_near_gaze() {
        let mut sim = GazeSimulator::new(0.05, 0.02, 3);
        sim.process_key(press(KeyCode::Char('j')));
        let samples: Vec<_> = (0..100).filter_map(|_| sim.sample()).collect();
        assert_eq!(samples.len(), 100);
        assert!(samples.iter().all(|p| p.distance(&GazePoint::CENTER) <= 0.03));
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_reset_restores_steady_centre() {
        let mut sim = GazeSimulator::new(0.05, 0.02, 1);
        sim.process_key(press(KeyCode::Left));
        sim.process_key(press(KeyCode::Char('j')));
        sim.process_key(press(KeyCode::Char('x')));

        sim.reset();
        assert!(!sim.is_restless());
        assert!(!sim.is_face_lost());
        assert_eq!(sim.sample(), Some(GazePoint::CENTER));
    }

    #[test]
    fn test_command_keys() {
        let mut sim = GazeSimulator::new(0.05, 0.02, 1);
        assert_eq!(sim.process_key(press(KeyCode::Char('m'))), Some(DemoCommand::ToggleMode));
        assert_eq!(sim.process_key(press(KeyCode::Char('c'))), Some(DemoCommand::Recalibrate));
        assert_eq!(
            sim.process_key(press(KeyCode::Char('r'))),
            Some(DemoCommand::StartResetProgram)
        );
        assert_eq!(sim.process_key(press(KeyCode::Char('n'))), Some(DemoCommand::Restart));
        assert_eq!(sim.process_key(press(KeyCode::Char('q'))), Some(DemoCommand::Quit));
        assert_eq!(
            sim.process_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(DemoCommand::Quit)
        );
        assert_eq!(sim.process_key(press(KeyCode::Char('z'))), None);
    }
}
