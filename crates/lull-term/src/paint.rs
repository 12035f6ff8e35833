//! Turns a [`Composition`] into terminal cells

use lull_core::presenter::{GradientDrift, Grain, Texture, Tint, Wash};
use lull_core::{Composition, Layer, ProceduralScene};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use unicode_width::UnicodeWidthChar;

use crate::renderer::{Cell, Color, RenderBackend};

/// Radius, in normalized units, at which the drift gradient fades out
const DRIFT_RADIUS: f32 = 0.75;

/// Rectangle of cells to paint, anchored at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy)]
struct Pixel {
    bg: Color,
    symbol: char,
    /// Ink opacity of `symbol` over `bg`
    ink: f32,
}

/// Paints compositions; owns the grain noise source
pub struct Painter {
    rng: StdRng,
}

impl Painter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn paint(&mut self, composition: &Composition, area: Area, backend: &mut dyn RenderBackend) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let base = Color::from(composition.base);
        let mut pixels = vec![
            Pixel {
                bg: base,
                symbol: ' ',
                ink: 0.0,
            };
            area.width as usize * area.height as usize
        ];

        for layer in &composition.layers {
            match layer {
                Layer::Procedural(scene) => self.paint_scene(scene, base, area, &mut pixels),
                Layer::Content { source, opacity } => {
                    paint_text(&source.body, *opacity, area, &mut pixels)
                }
            }
        }

        let ink = Color::from(Tint::INK);
        for y in 0..area.height {
            for x in 0..area.width {
                let p = pixels[y as usize * area.width as usize + x as usize];
                backend.paint_cell(
                    x,
                    y,
                    Cell {
                        symbol: p.symbol,
                        fg: p.bg.blend(&ink, p.ink),
                        bg: p.bg,
                    },
                );
            }
        }
    }

    fn paint_scene(&mut self, scene: &ProceduralScene, base: Color, area: Area, pixels: &mut [Pixel]) {
        for y in 0..area.height {
            for x in 0..area.width {
                let nx = (x as f32 + 0.5) / area.width as f32;
                let ny = (y as f32 + 0.5) / area.height as f32;
                let p = &mut pixels[y as usize * area.width as usize + x as usize];

                if let Some(drift) = &scene.drift {
                    p.bg = apply_drift(p.bg, drift, nx, ny);
                }
                if let Some(texture) = &scene.texture {
                    apply_texture(p, texture, nx, y);
                }
                if let Some(wash) = &scene.wash {
                    p.bg = apply_wash(p.bg, base, wash);
                }
                if let Some(grain) = &scene.grain {
                    p.bg = self.apply_grain(p.bg, grain);
                }
            }
        }
    }

    fn apply_grain(&mut self, bg: Color, grain: &Grain) -> Color {
        let amp = grain.amplitude as i16;
        let delta = self.rng.gen_range(-amp..=amp);
        bg.blend(&bg.offset(delta), 0.5)
            .blend(&Color::White, grain.alpha)
    }
}

fn apply_drift(bg: Color, drift: &GradientDrift, nx: f32, ny: f32) -> Color {
    let dx = nx - drift.center.0;
    let dy = ny - drift.center.1;
    let falloff = (1.0 - (dx * dx + dy * dy).sqrt() / DRIFT_RADIUS).max(0.0);
    bg.blend(&Color::from(drift.tint), drift.alpha * falloff)
}

fn apply_texture(p: &mut Pixel, texture: &Texture, nx: f32, y: u16) {
    let rows = (texture.spacing / 3).max(2) as u16;
    if y % rows != 0 {
        return;
    }
    let sway = texture.phase.sin() * 0.08;
    if nx < 0.2 + sway || nx > 0.8 + sway {
        return;
    }
    p.bg = p.bg.blend(&Color::from(texture.tint), texture.alpha);
    if p.ink < texture.alpha {
        p.symbol = '─';
        p.ink = texture.alpha;
    }
}

fn apply_wash(bg: Color, base: Color, wash: &Wash) -> Color {
    bg.blend(&Color::from(wash.tint), wash.alpha)
        .blend(&base, wash.shimmer)
}

/// Lay out content text with a two-cell margin; the strongest layer wins a cell
fn paint_text(body: &str, opacity: f32, area: Area, pixels: &mut [Pixel]) {
    let margin = 2u16;
    let columns = area.width.saturating_sub(margin * 2) as usize;
    if columns == 0 {
        return;
    }

    for (row, line) in wrap(body, columns).iter().enumerate() {
        let y = margin as usize / 2 + row;
        if y >= area.height as usize {
            break;
        }
        let mut x = margin as usize;
        for ch in line.chars() {
            let w = ch.width().unwrap_or(0);
            if w != 1 {
                continue;
            }
            let p = &mut pixels[y * area.width as usize + x];
            if opacity >= p.ink {
                p.symbol = ch;
                p.ink = opacity;
            }
            x += 1;
        }
    }
}

/// Greedy word wrap on display width
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut used = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word: String = word.chars().take(columns).collect();
            let mut w = word.chars().filter_map(|c| c.width()).sum::<usize>();
            while w > columns {
                word.pop();
                w = word.chars().filter_map(|c| c.width()).sum::<usize>();
            }
            let needed = if used == 0 { w } else { used + 1 + w };
            if needed > columns && used > 0 {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            if used > 0 {
                line.push(' ');
                used += 1;
            }
            line.push_str(&word);
            used += w;
        }
        lines.push(line);
    }
    lines
}
