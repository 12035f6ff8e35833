//! Neutralizer state machine
//!
//! Integrates spike and calm events into a continuous level in [0,4] and
//! turns that level into something to paint. The math lives once in
//! [`LevelDynamics`]; the two variants only differ in how they render:
//! - [`ProceduralNeutralizer`]: generative visuals keyed directly on level
//! - [`CrossfadeNeutralizer`]: bucketed content sources with crossfades

mod crossfade;
mod dynamics;
mod procedural;

pub use crossfade::{CrossfadeNeutralizer, SPIKE_COOLDOWN};
pub use dynamics::{LevelDynamics, CALM_GRACE, LEVEL_MAX};
pub use procedural::ProceduralNeutralizer;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mode::Mode;
use crate::presenter::{Bucket, Composition};

/// Which rendering variant a neutralizer uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeutralizerVariant {
    #[default]
    Procedural,
    Crossfade,
}

/// Capability shared by both variants
pub trait Neutralizer: Send {
    /// Level smoothing; only on frames that were scored
    fn advance(&mut self, now: Duration);

    /// Once per display refresh, with or without gaze. Moves presentation
    /// along without touching the level.
    fn refresh(&mut self, _now: Duration) {}

    /// Debounced spike; returns whether it was applied
    fn on_spike(&mut self, now: Duration) -> bool;

    fn on_calm(&mut self, now: Duration);

    fn set_mode(&mut self, mode: Mode);

    fn mode(&self) -> Mode;

    fn level(&self) -> f64;

    fn level_target(&self) -> f64;

    /// Back to level 0
    fn reset(&mut self);

    /// Layers to paint for this refresh
    fn compose(&self, now: Duration) -> Composition;

    fn variant(&self) -> NeutralizerVariant;

    fn bucket(&self) -> Bucket {
        Bucket::from_level(self.level())
    }
}
