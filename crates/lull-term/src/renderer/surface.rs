//! Surface size and colour types

use lull_core::presenter::Tint;

/// Drawable area in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    pub width: u16,
    pub height: u16,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Terminal colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Terminal default
    #[default]
    Reset,
    Black,
    White,
    Grey,
    DarkGrey,
    /// True colour RGB
    Rgb(u8, u8, u8),
}

impl Color {
    pub const HUD_TEXT: Self = Color::Rgb(70, 68, 60);
    pub const HUD_DIM: Self = Color::Rgb(150, 148, 140);
    pub const HUD_ALERT: Self = Color::Rgb(176, 84, 64);
    pub const HUD_CALM: Self = Color::Rgb(92, 128, 96);
    pub const HUD_BAR: Self = Color::Rgb(228, 226, 218);

    /// Convert to crossterm color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        match self {
            Color::Reset => crossterm::style::Color::Reset,
            Color::Black => crossterm::style::Color::Black,
            Color::White => crossterm::style::Color::White,
            Color::Grey => crossterm::style::Color::Grey,
            Color::DarkGrey => crossterm::style::Color::DarkGrey,
            Color::Rgb(r, g, b) => crossterm::style::Color::Rgb {
                r: *r,
                g: *g,
                b: *b,
            },
        }
    }

    /// Blend two colors with alpha (0.0 = self, 1.0 = other)
    pub fn blend(&self, other: &Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        match (self.to_rgb(), other.to_rgb()) {
            (Some((r1, g1, b1)), Some((r2, g2, b2))) => {
                let mix = |a: u8, b: u8| (a as f32 * (1.0 - alpha) + b as f32 * alpha).round() as u8;
                Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
            }
            _ => {
                if alpha > 0.5 {
                    *other
                } else {
                    *self
                }
            }
        }
    }

    /// Shift every channel by `delta`, saturating
    pub fn offset(&self, delta: i16) -> Color {
        match self.to_rgb() {
            Some((r, g, b)) => {
                let shift = |c: u8| (c as i16 + delta).clamp(0, 255) as u8;
                Color::Rgb(shift(r), shift(g), shift(b))
            }
            None => *self,
        }
    }

    /// Convert to RGB tuple if possible
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Rgb(r, g, b) => Some((*r, *g, *b)),
            Color::Black => Some((0, 0, 0)),
            Color::White => Some((255, 255, 255)),
            Color::Grey => Some((128, 128, 128)),
            Color::DarkGrey => Some((64, 64, 64)),
            Color::Reset => None,
        }
    }
}

impl From<Tint> for Color {
    fn from(tint: Tint) -> Self {
        Color::Rgb(tint.r, tint.g, tint.b)
    }
}
