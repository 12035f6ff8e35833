//! Procedural-only neutralizer

use std::time::Duration;

use crate::mode::Mode;
use crate::presenter::{Composition, ProceduralScene};

use super::{LevelDynamics, Neutralizer, NeutralizerVariant};

/// Renders a generative scene straight from the level.
///
/// Nothing here can thrash visibly, so spikes apply without a cooldown.
#[derive(Debug, Clone)]
pub struct ProceduralNeutralizer {
    dynamics: LevelDynamics,
}

impl ProceduralNeutralizer {
    pub fn new(mode: Mode) -> Self {
        Self {
            dynamics: LevelDynamics::new(mode),
        }
    }

    pub fn dynamics(&self) -> &LevelDynamics {
        &self.dynamics
    }
}

impl Default for ProceduralNeutralizer {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl Neutralizer for ProceduralNeutralizer {
    fn advance(&mut self, _now: Duration) {
        self.dynamics.advance();
    }

    fn on_spike(&mut self, now: Duration) -> bool {
        self.dynamics.on_spike(now);
        true
    }

    fn on_calm(&mut self, now: Duration) {
        self.dynamics.on_calm(now);
    }

    fn set_mode(&mut self, mode: Mode) {
        self.dynamics.set_mode(mode);
    }

    fn mode(&self) -> Mode {
        self.dynamics.mode()
    }

    fn level(&self) -> f64 {
        self.dynamics.level()
    }

    fn level_target(&self) -> f64 {
        self.dynamics.target()
    }

    fn reset(&mut self) {
        self.dynamics.reset();
    }

    fn compose(&self, now: Duration) -> Composition {
        Composition::procedural(ProceduralScene::for_level(self.dynamics.level(), now))
    }

    fn variant(&self) -> NeutralizerVariant {
        NeutralizerVariant::Procedural
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_to_back_spikes_apply() {
        let mut n = ProceduralNeutralizer::default();
        assert!(n.on_spike(Duration::from_millis(1000)));
        assert!(n.on_spike(Duration::from_millis(1010)));
        assert_eq!(n.level_target(), 2.0);
    }

    #[test]
    fn test_scene_follows_level() {
        let mut n = ProceduralNeutralizer::default();
        let calm = n.compose(Duration::ZERO);
        assert!(calm.is_procedural_only());

        for i in 0..4 {
            n.on_spike(Duration::from_secs(i));
        }
        for _ in 0..200 {
            n.advance(Duration::ZERO);
        }
        assert_eq!(n.bucket().index(), 4);
        assert_ne!(n.compose(Duration::ZERO), calm);
    }
}
