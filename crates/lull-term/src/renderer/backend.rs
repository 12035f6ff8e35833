//! Render backend trait definition

use unicode_width::UnicodeWidthChar;

use super::surface::{Color, SurfaceCapabilities};

/// Error type for rendering operations
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Init error: {0}")]
    Init(String),

    #[error("Frame error: {0}")]
    Frame(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: ' ',
            fg: Color::Black,
            bg: Color::White,
        }
    }
}

/// Row-major grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write text keeping each cell's background; wide glyphs take two columns
    pub fn put_text(&mut self, x: u16, y: u16, text: &str, fg: Color) {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > self.width {
                break;
            }
            if let Some(idx) = self.index(col, y) {
                let cell = &mut self.cells[idx];
                cell.symbol = ch;
                cell.fg = fg;
            }
            if w == 2 {
                if let Some(idx) = self.index(col + 1, y) {
                    self.cells[idx].symbol = ' ';
                }
            }
            col += w;
        }
    }

    /// Cells of row `y` as a string
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y).map(|c| c.symbol))
            .collect()
    }
}

/// Cell-based rendering backend
pub trait RenderBackend: Send {
    /// Get surface capabilities
    fn capabilities(&self) -> SurfaceCapabilities;

    /// Begin a new render frame
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// End frame and present to display
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Clear the render surface with a color
    fn clear(&mut self, color: Color);

    /// Overwrite one cell
    fn paint_cell(&mut self, x: u16, y: u16, cell: Cell);

    /// Render text at a cell position over the existing background
    fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Color);
}
