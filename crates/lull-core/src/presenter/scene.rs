//! What to paint on a frame.
//!
//! A [`Composition`] is a back-to-front list of layers over a beige base.
//! Painting it (terminal cells, pixels, ...) is left to the host.

use std::sync::Arc;
use std::time::Duration;

use super::source::ContentSource;

/// Opaque RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Paper beige every frame starts from
    pub const BASE: Self = Self::rgb(245, 245, 240);
    pub const DRIFT: Self = Self::rgb(220, 218, 207);
    pub const TEXTURE: Self = Self::rgb(210, 208, 199);
    pub const WASH: Self = Self::rgb(234, 232, 226);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const INK: Self = Self::rgb(96, 94, 86);
}

/// Slow radial gradient whose centre wanders around the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDrift {
    /// Normalized centre of the gradient
    pub center: (f32, f32),
    pub alpha: f32,
    pub tint: Tint,
}

/// Faint horizontal strokes swaying around the screen centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    pub alpha: f32,
    /// Stroke spacing in pixels; coarser at higher levels
    pub spacing: u32,
    /// Sway phase in radians
    pub phase: f32,
    pub tint: Tint,
}

/// Near-imperceptible colour fade over the whole screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wash {
    pub alpha: f32,
    /// Extra base-colour overlay that breathes very slowly
    pub shimmer: f32,
    pub tint: Tint,
}

/// Light static grain plus a white veil
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grain {
    pub alpha: f32,
    /// Maximum per-channel noise offset
    pub amplitude: u8,
}

/// Generative visual parameterized by level and time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProceduralScene {
    pub drift: Option<GradientDrift>,
    pub texture: Option<Texture>,
    pub wash: Option<Wash>,
    pub grain: Option<Grain>,
}

impl ProceduralScene {
    /// Scene for a neutralizer level: more boring as the level rises
    pub fn for_level(level: f64, now: Duration) -> Self {
        let lvl = level.clamp(0.0, 4.0) as f32;
        let t = now.as_secs_f32();
        let mut scene = Self::default();

        if lvl < 1.0 {
            scene.drift = Some(drift_at(t, 0.06 * (1.0 - lvl)));
        }

        if lvl >= 0.8 {
            scene.texture = Some(Texture {
                alpha: (0.03 + (lvl - 0.8) * 0.04).min(0.08),
                spacing: if lvl < 2.0 { 6 } else { 10 },
                phase: t * 0.2,
                tint: Tint::TEXTURE,
            });
        }

        if lvl >= 2.7 {
            let k = (t * 0.02).sin() * 0.5 + 0.5;
            scene.wash = Some(Wash {
                alpha: 0.10 + 0.10 * (lvl - 2.7),
                shimmer: 0.12 * k,
                tint: Tint::WASH,
            });
        }

        if lvl >= 3.6 {
            scene.grain = Some(Grain {
                alpha: (0.02 + (lvl - 3.6) * 0.05).min(0.06),
                amplitude: 8,
            });
        }

        scene
    }

    /// Fallback shown whenever no content source is ready
    pub fn fallback(now: Duration) -> Self {
        Self {
            drift: Some(drift_at(now.as_secs_f32(), 0.06)),
            ..Self::default()
        }
    }
}

fn drift_at(t: f32, alpha: f32) -> GradientDrift {
    GradientDrift {
        center: (
            (t * 0.05).sin() * 0.5 + 0.5,
            (t * 0.04).cos() * 0.5 + 0.5,
        ),
        alpha,
        tint: Tint::DRIFT,
    }
}

/// One layer of a composition
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Procedural(ProceduralScene),
    Content {
        source: Arc<ContentSource>,
        opacity: f32,
    },
}

/// Back-to-front layers over a base colour
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub base: Tint,
    pub layers: Vec<Layer>,
}

impl Composition {
    pub fn procedural(scene: ProceduralScene) -> Self {
        Self {
            base: Tint::BASE,
            layers: vec![Layer::Procedural(scene)],
        }
    }

    /// True when nothing but generated visuals are on screen
    pub fn is_procedural_only(&self) -> bool {
        self.layers
            .iter()
            .all(|layer| matches!(layer, Layer::Procedural(_)))
    }

    /// Opacity of the content layer for `bucket`, if present
    pub fn content_opacity(&self, bucket: super::Bucket) -> Option<f32> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Content { source, opacity } if source.bucket == bucket => Some(*opacity),
            _ => None,
        })
    }
}
