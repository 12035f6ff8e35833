//! Recorded gaze traces
//!
//! CSV with one frame per line: `t_ms,x,y`. Empty `x` and `y` mean no gaze
//! on that frame. Blank lines, `#` comments and a `t_ms,...` header are
//! skipped.

use std::io::{BufRead, Write};
use std::time::Duration;

use lull_core::{GazePoint, GazeSample};

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
}

/// One recorded refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceFrame {
    pub at: Duration,
    pub gaze: GazeSample,
}

fn line_error(line: usize, message: impl Into<String>) -> TraceError {
    TraceError::Line {
        line,
        message: message.into(),
    }
}

fn parse_coord(field: &str, line: usize) -> Result<f64, TraceError> {
    let value: f64 = field
        .parse()
        .map_err(|_| line_error(line, format!("invalid coordinate '{field}'")))?;
    if !value.is_finite() {
        return Err(line_error(line, format!("non-finite coordinate '{field}'")));
    }
    Ok(value)
}

/// Parse a whole trace; timestamps must not go backwards
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceFrame>, TraceError> {
    let mut frames: Vec<TraceFrame> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("t_ms") {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(line_error(
                line_no,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        }

        let t_ms: u64 = fields[0]
            .parse()
            .map_err(|_| line_error(line_no, format!("invalid timestamp '{}'", fields[0])))?;
        let at = Duration::from_millis(t_ms);
        if let Some(prev) = frames.last() {
            if at < prev.at {
                return Err(line_error(line_no, "timestamp goes backwards"));
            }
        }

        let gaze = match (fields[1], fields[2]) {
            ("", "") => None,
            ("", _) | (_, "") => {
                return Err(line_error(line_no, "x and y must both be present or both empty"))
            }
            (x, y) => Some(GazePoint::new(
                parse_coord(x, line_no)?,
                parse_coord(y, line_no)?,
            )),
        };

        frames.push(TraceFrame { at, gaze });
    }

    Ok(frames)
}

/// Write frames in the format [`parse_trace`] reads
pub fn write_trace(frames: &[TraceFrame], mut writer: impl Write) -> std::io::Result<()> {
    writeln!(writer, "t_ms,x,y")?;
    for frame in frames {
        let t_ms = frame.at.as_millis();
        match frame.gaze {
            Some(p) => writeln!(writer, "{t_ms},{:.6},{:.6}", p.x, p.y)?,
            None => writeln!(writer, "{t_ms},,")?,
        }
    }
    Ok(())
}
