use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lull_cli::{generate, parse_trace, replay, write_trace, SynthSpec, TraceFrame};
use lull_config::{logging, LullConfig};
use lull_core::Mode;

#[derive(Parser)]
#[command(name = "lull", version, about = "Drive lull sessions from gaze traces")]
struct Cli {
    /// Config file (default: $LULL_CONFIG, then the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Starting mode: primary or recovery
    #[arg(short, long, global = true)]
    mode: Option<Mode>,

    /// Print every frame as a JSON line before the summary
    #[arg(long, global = true)]
    frames: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a `t_ms,x,y` CSV trace
    Replay { file: PathBuf },

    /// Generate a calm/restless trace and replay it
    Synth {
        #[arg(long, default_value_t = 7)]
        seed: u64,

        /// Trace length in seconds
        #[arg(long, default_value_t = 60.0)]
        secs: f64,

        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Seconds of calm between restless stretches
        #[arg(long, default_value_t = 15.0)]
        calm_secs: f64,

        /// Seconds of each restless stretch
        #[arg(long, default_value_t = 5.0)]
        restless_secs: f64,

        /// Per-frame probability of losing the face
        #[arg(long, default_value_t = 0.0)]
        dropout: f64,

        /// Also write the generated trace to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn seconds(value: f64, name: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("invalid --{name}: {value}"))
}

fn load_frames(cmd: Commands) -> Result<Vec<TraceFrame>> {
    match cmd {
        Commands::Replay { file } => {
            let reader = File::open(&file)
                .with_context(|| format!("opening trace {}", file.display()))?;
            parse_trace(BufReader::new(reader))
                .with_context(|| format!("parsing trace {}", file.display()))
        }
        Commands::Synth {
            seed,
            secs,
            frame_ms,
            calm_secs,
            restless_secs,
            dropout,
            csv,
        } => {
            let spec = SynthSpec {
                seed,
                duration: seconds(secs, "secs")?,
                frame: Duration::from_millis(frame_ms.max(1)),
                calm: seconds(calm_secs, "calm-secs")?,
                restless: seconds(restless_secs, "restless-secs")?,
                dropout,
            };
            let frames = generate(&spec);
            if let Some(path) = csv {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                write_trace(&frames, BufWriter::new(file))?;
            }
            Ok(frames)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LullConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(mode) = cli.mode {
        config = config.with_mode(mode);
    }
    logging::init_stderr(&config.logging).context("initializing logging")?;

    let frames = load_frames(cli.cmd)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("starting content runtime")?;
    let session = config
        .build_session(Some(runtime.handle().clone()))
        .context("building session")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = if cli.frames {
        replay(session, &frames, Some(&mut out))?
    } else {
        replay(session, &frames, None)?
    };

    serde_json::to_writer_pretty(&mut out, &summary)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
