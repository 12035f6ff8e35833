//! Terminal backend implementation

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use super::backend::{Cell, CellBuffer, RenderBackend, RenderError};
use super::surface::{Color, SurfaceCapabilities};

/// Crossterm backend that only rewrites cells changed since the last frame
pub struct TerminalBackend {
    buffer: CellBuffer,
    prev_buffer: CellBuffer,
    clear_color: Color,
    /// Forces a full repaint after a resize
    dirty: bool,
}

impl TerminalBackend {
    pub fn new() -> Result<Self, RenderError> {
        let (width, height) = terminal::size().map_err(|e| RenderError::Init(e.to_string()))?;

        Ok(Self {
            buffer: CellBuffer::new(width, height),
            prev_buffer: CellBuffer::new(width, height),
            clear_color: Color::Rgb(245, 245, 240),
            dirty: true,
        })
    }

    /// Refresh terminal size
    pub fn refresh_size(&mut self) -> Result<(), RenderError> {
        let (width, height) = terminal::size()?;

        if width != self.buffer.width() || height != self.buffer.height() {
            self.buffer = CellBuffer::new(width, height);
            self.prev_buffer = CellBuffer::new(width, height);
            self.dirty = true;
        }

        Ok(())
    }
}

impl RenderBackend for TerminalBackend {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.buffer.width(),
            height: self.buffer.height(),
        }
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.refresh_size()?;

        std::mem::swap(&mut self.buffer, &mut self.prev_buffer);
        self.buffer.fill(Cell {
            symbol: ' ',
            fg: Color::Black,
            bg: self.clear_color,
        });

        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let mut stdout = io::stdout();
        queue!(stdout, cursor::Hide)?;

        for y in 0..self.buffer.height() {
            for x in 0..self.buffer.width() {
                let (Some(cell), Some(prev)) = (self.buffer.get(x, y), self.prev_buffer.get(x, y))
                else {
                    continue;
                };

                // Diff render - only update changed cells
                if self.dirty || cell != prev {
                    queue!(
                        stdout,
                        cursor::MoveTo(x, y),
                        SetForegroundColor(cell.fg.to_crossterm()),
                        SetBackgroundColor(cell.bg.to_crossterm()),
                        Print(cell.symbol)
                    )?;
                }
            }
        }

        stdout
            .flush()
            .map_err(|e| RenderError::Frame(e.to_string()))?;
        self.dirty = false;

        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = color;
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
