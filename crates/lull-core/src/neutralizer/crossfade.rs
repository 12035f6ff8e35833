//! Content-crossfading neutralizer

use std::time::Duration;

use tracing::debug;

use crate::mode::Mode;
use crate::presenter::{Composition, ContentLoader, ContentPresenter, PresentationState};

use super::{LevelDynamics, Neutralizer, NeutralizerVariant};

/// Minimum spacing between applied spikes when crossfading real content
pub const SPIKE_COOLDOWN: Duration = Duration::from_millis(600);

/// Drives a [`ContentPresenter`] from the level, suppressing spike bursts
pub struct CrossfadeNeutralizer<L: ContentLoader> {
    dynamics: LevelDynamics,
    presenter: ContentPresenter<L>,
    cooldown: Duration,
}

impl<L: ContentLoader> CrossfadeNeutralizer<L> {
    pub fn new(mode: Mode, loader: L) -> Self {
        Self {
            dynamics: LevelDynamics::new(mode),
            presenter: ContentPresenter::new(loader),
            cooldown: SPIKE_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn presentation(&self) -> PresentationState {
        self.presenter.state()
    }
}

impl<L: ContentLoader> Neutralizer for CrossfadeNeutralizer<L> {
    fn advance(&mut self, _now: Duration) {
        self.dynamics.advance();
    }

    fn refresh(&mut self, _now: Duration) {
        let desired = self.bucket();
        self.presenter.step(desired, self.dynamics.mode().fade_step());
    }

    fn on_spike(&mut self, now: Duration) -> bool {
        if let Some(since) = self.dynamics.since_last_spike(now) {
            if since < self.cooldown {
                debug!(since_ms = since.as_millis() as u64, "spike suppressed by cooldown");
                return false;
            }
        }
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
        self.presenter.reset();
    }

    fn compose(&self, now: Duration) -> Composition {
        self.presenter.compose(now)
    }

    fn variant(&self) -> NeutralizerVariant {
        NeutralizerVariant::Crossfade
    }
}
