//! Off-screen backend

use super::backend::{Cell, CellBuffer, RenderBackend, RenderError};
use super::surface::{Color, SurfaceCapabilities};

/// Keeps the last presented frame in memory; used for tests and snapshots
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    buffer: CellBuffer,
    presented: CellBuffer,
    frames: u64,
}

impl MemoryBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: CellBuffer::new(width, height),
            presented: CellBuffer::new(width, height),
            frames: 0,
        }
    }

    /// Last frame passed to `end_frame`
    pub fn presented(&self) -> &CellBuffer {
        &self.presented
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for MemoryBackend {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.buffer.width(),
            height: self.buffer.height(),
        }
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.buffer.fill(Cell::default());
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.presented.clone_from(&self.buffer);
        self.frames += 1;
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.buffer.fill(Cell {
            symbol: ' ',
            fg: Color::Black,
            bg: color,
        });
    }

    fn paint_cell(&mut self, x: u16, y: u16, cell: Cell) {
        self.buffer.set(x, y, cell);
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Color) {
        self.buffer.put_text(x, y, text, color);
    }
}
