//! Terminal biofeedback demo
//!
//! Controls (simulating a gaze tracker):
//! - Arrows: move gaze
//! - j: toggle restless jitter
//! - x: toggle face loss
//! - m: switch mode and recalibrate
//! - c: recalibrate
//! - r: start the reset program
//! - n: restart the session with a centred, steady gaze
//! - q / Ctrl-Q: quit
//!
//! Logs go to a file since the renderer owns the terminal.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lull_config::{logging, LullConfig};
use lull_core::Mode;
use lull_term::{DemoRunner, GazeSimulator, Painter, TerminalBackend};

#[derive(Debug, Parser)]
#[command(name = "lull-demo", version, about = "Keyboard-driven lull session in the terminal")]
struct Args {
    /// Config file (default: $LULL_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting mode: primary or recovery
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Seed for simulated jitter and grain
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Log file (default: logging.file, else lull-demo.log in the temp dir)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = LullConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(mode) = args.mode {
        config = config.with_mode(mode);
    }

    let log_path = args
        .log_file
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(|| std::env::temp_dir().join("lull-demo.log"));
    logging::init_file(&config.logging, &log_path).context("initializing logging")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("starting content runtime")?;

    let session = config
        .build_session(Some(runtime.handle().clone()))
        .context("building session")?;
    let simulator = GazeSimulator::new(config.demo.step, config.demo.jitter, args.seed);
    let mut runner = DemoRunner::new(session, simulator, Painter::new(args.seed))
        .with_tick_rate(Duration::from_millis(config.demo.tick_ms));

    let mut backend = TerminalBackend::new().context("opening terminal")?;
    runner.run(&mut backend).context("running demo")?;

    let summary = runner.finish();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
