//! lull-term: terminal presentation for lull
//!
//! - Cell renderer with crossterm and in-memory backends
//! - Painter turning compositions into cells
//! - Keyboard gaze simulator standing in for a face tracker
//! - HUD and the demo runner behind the `lull-demo` binary

pub mod app;
pub mod hud;
pub mod paint;
pub mod renderer;
pub mod simulator;

pub use app::DemoRunner;
pub use paint::{Area, Painter};
pub use renderer::{Color, MemoryBackend, RenderBackend, RenderError, TerminalBackend};
pub use simulator::{DemoCommand, GazeSimulator};
