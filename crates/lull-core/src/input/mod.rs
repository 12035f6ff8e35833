//! Gaze input abstraction
//!
//! Any source producing normalized 2-D points at irregular intervals can
//! drive a session. A frame without a point means the face or gaze was lost.

mod gaze;

pub use gaze::GazePoint;

/// One frame's worth of gaze input; `None` means no face/gaze this frame
pub type GazeSample = Option<GazePoint>;
