use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::time::Duration;

use lull_cli::{generate, parse_trace, replay, write_trace, SynthSpec};
use lull_core::{ProceduralNeutralizer, Session, SessionConfig};

fn session() -> Session {
    let config = SessionConfig {
        primary_calibration_secs: 1.0,
        ..Default::default()
    };
    Session::new(config, Box::new(ProceduralNeutralizer::default())).unwrap()
}

#[test]
fn test_synth_trace_survives_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.csv");

    let spec = SynthSpec {
        duration: Duration::from_secs(6),
        calm: Duration::from_secs(3),
        restless: Duration::from_secs(3),
        dropout: 0.05,
        ..Default::default()
    };
    let frames = generate(&spec);
    write_trace(&frames, BufWriter::new(File::create(&path).unwrap())).unwrap();

    let loaded = parse_trace(BufReader::new(File::open(&path).unwrap())).unwrap();
    assert_eq!(loaded.len(), frames.len());
    for (a, b) in loaded.iter().zip(&frames) {
        assert_eq!(a.at, b.at);
        assert_eq!(a.gaze.is_some(), b.gaze.is_some());
    }

    let summary = replay(session(), &loaded, None).unwrap();
    assert_eq!(summary.frames, frames.len() as u64);
    assert_eq!(
        summary.no_signal_frames,
        frames.iter().filter(|f| f.gaze.is_none()).count() as u64
    );
    assert!(summary.spikes >= 1);
}

#[test]
fn test_hand_written_trace_with_face_loss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lost.csv");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "t_ms,x,y").unwrap();
    for i in 0..120u64 {
        if (60..80).contains(&i) {
            writeln!(file, "{},,", i * 16).unwrap();
        } else {
            writeln!(file, "{},0.5,0.5", i * 16).unwrap();
        }
    }
    drop(file);

    let frames = parse_trace(BufReader::new(File::open(&path).unwrap())).unwrap();
    let summary = replay(session(), &frames, None).unwrap();
    assert_eq!(summary.frames, 120);
    assert_eq!(summary.no_signal_frames, 20);
    assert_eq!(summary.spikes, 0);
    assert_eq!(summary.max_level, 0.0);
}
