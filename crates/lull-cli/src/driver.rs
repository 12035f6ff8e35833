//! Offline session driving

use std::io::Write;

use lull_core::{Session, SessionSummary};
use tracing::{debug, info};

use crate::trace::TraceFrame;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Feed every frame through the session, optionally writing one JSON
/// snapshot per line to `frames_out`, then stop it
pub fn replay(
    mut session: Session,
    frames: &[TraceFrame],
    mut frames_out: Option<&mut dyn Write>,
) -> Result<SessionSummary, DriverError> {
    info!(frames = frames.len(), mode = %session.mode(), "replaying trace");

    for frame in frames {
        let snapshot = session.advance(frame.at, frame.gaze);
        if snapshot.spiked {
            debug!(at_ms = frame.at.as_millis() as u64, level = snapshot.level, "spike");
        }
        if let Some(out) = frames_out.as_mut() {
            serde_json::to_writer(&mut **out, &snapshot)?;
            out.write_all(b"\n")?;
        }
    }

    let summary = session.stop();
    info!(
        spikes = summary.spikes,
        max_level = summary.max_level,
        "replay finished"
    );
    Ok(summary)
}
