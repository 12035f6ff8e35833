//! Status lines along the bottom of the screen

use std::time::Duration;

use lull_core::neutralizer::LEVEL_MAX;
use lull_core::{Snapshot, Status};

use crate::renderer::{Cell, Color, RenderBackend, SurfaceCapabilities};

/// Rows reserved for the HUD
pub const HUD_ROWS: u16 = 2;

const BAR_WIDTH: usize = 10;

const HELP: &str = "←↑↓→ gaze  j jitter  x face  m mode  c calibrate  r reset program  n restart  q quit";

/// Simulator flags shown next to the help line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudFlags {
    pub restless: bool,
    pub face_lost: bool,
}

/// `█░` bar for a value in `[0, max]`
pub fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled)
}

/// `m:ss`
pub fn clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Metrics line for one snapshot
pub fn status_line(snapshot: &Snapshot, spikes: u32) -> String {
    let mut line = format!(
        "{} │ {} │ arousal {:.2} base {:.3} │ level {} {:.2}→{:.2} │ bucket {} │ spikes {}",
        snapshot.mode,
        snapshot.status,
        snapshot.arousal,
        snapshot.baseline,
        bar(snapshot.level, LEVEL_MAX),
        snapshot.level,
        snapshot.level_target,
        snapshot.bucket,
        spikes,
    );
    if let Some(remaining) = snapshot.calibration_remaining {
        line.push_str(&format!(" │ calibrating {:.1}s", remaining.as_secs_f64()));
    }
    if let Some(remaining) = snapshot.program_remaining {
        line.push_str(&format!(" │ reset program {}", clock(remaining)));
    }
    line
}

fn status_color(status: Status, spiked: bool) -> Color {
    if spiked {
        return Color::HUD_ALERT;
    }
    match status {
        Status::NoSignal => Color::HUD_ALERT,
        Status::Calibrating => Color::HUD_DIM,
        Status::Calibrated | Status::Running => Color::HUD_CALM,
    }
}

/// Render the HUD on the last [`HUD_ROWS`] rows
pub fn render_hud(
    snapshot: &Snapshot,
    spikes: u32,
    flags: HudFlags,
    backend: &mut dyn RenderBackend,
) {
    let SurfaceCapabilities { width, height } = backend.capabilities();
    if height < HUD_ROWS {
        return;
    }
    let top = height - HUD_ROWS;

    for y in top..height {
        for x in 0..width {
            backend.paint_cell(
                x,
                y,
                Cell {
                    symbol: ' ',
                    fg: Color::HUD_TEXT,
                    bg: Color::HUD_BAR,
                },
            );
        }
    }

    backend.draw_text(
        1,
        top,
        &status_line(snapshot, spikes),
        status_color(snapshot.status, snapshot.spiked),
    );

    let mut help = HELP.to_string();
    if flags.restless {
        help.push_str("  [jitter]");
    }
    if flags.face_lost {
        help.push_str("  [no face]");
    }
    backend.draw_text(1, top + 1, &help, Color::HUD_DIM);
}
