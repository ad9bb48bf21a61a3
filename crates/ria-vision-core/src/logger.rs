//! Process-wide log installation for the node binary and tests.
//!
//! Records from the `ria_vision*` crates are filtered at the requested level;
//! everything else (image decoders, clap) is capped at `warn` so per-frame
//! debug output stays readable.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

const OWN_TARGET_PREFIX: &str = "ria_vision";

/// Effective filter for a record `target` when the node runs at `level`.
fn target_filter(target: &str, level: LevelFilter) -> LevelFilter {
    if target.starts_with(OWN_TARGET_PREFIX) {
        level
    } else {
        level.min(LevelFilter::Warn)
    }
}

struct NodeLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for NodeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= target_filter(metadata.target(), self.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let secs = self.started.elapsed().as_secs_f64();
        let tag = match record.level() {
            Level::Error => "E",
            Level::Warn => "W",
            Level::Info => "I",
            Level::Debug => "D",
            Level::Trace => "T",
        };
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{tag} {secs:>9.3} {}: {}", record.target(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static NODE_LOGGER: OnceLock<NodeLogger> = OnceLock::new();

/// Install the stderr logger at `level`.
///
/// Only the first call installs anything; later calls return `Ok(())`
/// without changing the level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if NODE_LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = NODE_LOGGER.get_or_init(|| NodeLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber. `RUST_LOG` overrides the default
/// `ria_vision=info,warn` filter; `json` selects line-delimited JSON output.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{OWN_TARGET_PREFIX}=info,warn")));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
