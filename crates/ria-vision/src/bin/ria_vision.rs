use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use ria_vision::replay::{spawn_capture, ReplayScenario};
use ria_vision::{DecisionCycle, FrameSlot, ReportPublisher, TickLoop, VisionConfig};

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

#[derive(Parser, Debug)]
#[command(
    name = "ria-vision",
    version,
    about = "Obstacle and fiducial-marker decisions from depth + color frames"
)]
struct Cli {
    /// Log level for the stderr logger.
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the decision loop over a recorded scenario and write a report.
    Replay(ReplayArgs),
    /// Write the default configuration as JSON.
    InitConfig {
        #[arg(default_value = "ria_vision.json")]
        path: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ReplayArgs {
    /// Scenario JSON listing depth/color image pairs.
    scenario: PathBuf,
    /// Node configuration (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Report output path.
    #[arg(long, default_value = "ria_vision_report.json")]
    output: PathBuf,
    /// Write overlay PNGs here; enables visualization.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,
    /// Log per-cycle decisions at info level.
    #[arg(long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(_level: LevelFilter) {
    // level comes from RUST_LOG when tracing is on
    let _ = LogTracer::init();
    ria_vision::core::init_tracing(false);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) {
    if let Err(err) = ria_vision::core::init_with_level(level) {
        eprintln!("logger not installed: {err}");
    }
}

fn run_replay(args: ReplayArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => VisionConfig::load_json(path)?,
        None => VisionConfig::default(),
    };
    config.verbose |= args.verbose;
    config.visualize |= args.overlay_dir.is_some();

    let scenario = ReplayScenario::load_json(&args.scenario)?;
    log::info!(
        "replaying {} frames from {}",
        scenario.frames.len(),
        args.scenario.display()
    );

    let mut cycle = DecisionCycle::new(&config, scenario.localizer())?;
    let ticker = TickLoop::from_rate_hz(config.tick_rate_hz)?;
    let mut publisher = ReportPublisher::new();
    if let Some(dir) = &args.overlay_dir {
        fs::create_dir_all(dir)?;
        publisher = publisher.with_overlay_dir(dir);
    }

    let slot = Arc::new(FrameSlot::new());
    let shutdown = Arc::new(AtomicBool::new(false));
    let capture = spawn_capture(scenario, Arc::clone(&slot), Arc::clone(&shutdown));

    ticker.run(&shutdown, |_| {
        let (outcome, flow) = cycle.drain_step(&slot, &mut publisher, capture.is_finished());
        publisher.record(outcome);
        flow
    });
    shutdown.store(true, Ordering::Release);

    let summary = capture
        .join()
        .map_err(|_| "capture thread panicked")?;
    let report = publisher.finish(slot.dropped(), summary.failed);
    report.write_json(&args.output)?;

    println!(
        "processed {} frames ({} obstacle, {} markers, {} dropped), wrote {}",
        report.processed,
        report.obstacle_frames,
        report.markers_published,
        report.dropped_frames,
        args.output.display()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.into());

    match cli.command {
        Command::Replay(args) => run_replay(args),
        Command::InitConfig { path } => {
            VisionConfig::default().write_json(&path)?;
            println!("wrote default config to {}", path.display());
            Ok(())
        }
    }
}
