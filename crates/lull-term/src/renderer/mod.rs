//! Rendering backend abstraction
//!
//! - [`TerminalBackend`]: crossterm with diff rendering
//! - [`MemoryBackend`]: off-screen, for tests

mod backend;
mod memory;
mod surface;
mod terminal;

pub use backend::{Cell, CellBuffer, RenderBackend, RenderError};
pub use memory::MemoryBackend;
pub use surface::{Color, SurfaceCapabilities};
pub use terminal::TerminalBackend;
