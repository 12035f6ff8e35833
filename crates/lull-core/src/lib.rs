//! lull-core: signal processing and control pipeline for the lull biofeedback loop
//!
//! This crate turns a stream of noisy 2-D gaze samples into a calming
//! presentation decision:
//! - Rolling window statistics with O(1) mean/variance
//! - Arousal scoring from gaze velocity and positional jitter
//! - Timed calibration and a slowly drifting baseline
//! - Debounced, edge-triggered spike detection
//! - A neutralizer state machine integrating spikes into a smoothed level
//! - Bucketed content crossfading with a procedural fallback
//!
//! Everything is driven from a single [`Session`] that the host application
//! advances once per display refresh.

pub mod error;
pub mod input;
pub mod mode;
pub mod neutralizer;
pub mod presenter;
pub mod session;
pub mod signal;
pub mod stats;

// Re-export commonly used types
pub use error::SessionError;
pub use input::{GazePoint, GazeSample};
pub use mode::{Mode, ModeParseError};
pub use neutralizer::{
    CrossfadeNeutralizer, LevelDynamics, Neutralizer, NeutralizerVariant, ProceduralNeutralizer,
};
pub use presenter::{
    Bucket, Composition, ContentLoader, ContentPresenter, ContentSource, DirectoryLoader, Layer,
    NullLoader, PrepareHandle, PresentationState, ProceduralScene, Readiness,
};
pub use session::{Session, SessionConfig, SessionMetrics, SessionSummary, Snapshot, Status};
pub use signal::{score, ArousalSample, BaselineTracker, SpikeDetector, SpikeSignal};
pub use stats::RollingWindowStats;
