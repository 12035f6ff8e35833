//! lull-cli: offline driving of lull sessions
//!
//! Replays recorded gaze traces or synthetic ones through a session and
//! reports what the loop did.

pub mod driver;
pub mod synth;
pub mod trace;

pub use driver::{replay, DriverError};
pub use synth::{generate, SynthSpec};
pub use trace::{parse_trace, write_trace, TraceError, TraceFrame};
