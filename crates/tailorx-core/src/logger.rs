//! Logging setup for binaries and tests.
//!
//! Library code only talks to the `log` facade. A binary installs either the
//! stderr logger below (`init_with_level`) or, with the `tracing` feature, a
//! `tracing-subscriber` pipeline (`init_tracing`).
//!
//! Records from the `tailorx*` crates pass at the requested level; records
//! from dependencies are held to `Warn` so that `--log-level debug` stays
//! readable.

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

const OWN_TARGET_PREFIX: &str = "tailorx";
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Warn;
#[cfg(feature = "tracing")]
const DEFAULT_TRACING_FILTER: &str = "warn,tailorx=info,tailorx_core=info,tailorx_measure=info";

struct StderrLogger {
    own_level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    fn threshold(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET_PREFIX) {
            self.own_level
        } else {
            self.own_level.min(DEPENDENCY_LEVEL)
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.threshold(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// `[  0.042s  INFO measure::engine] message\n`; the `tailorx_` crate prefix is
/// dropped from the target.
fn format_line(
    elapsed: Duration,
    level: Level,
    target: &str,
    args: &std::fmt::Arguments,
) -> String {
    let target = target.strip_prefix("tailorx_").unwrap_or(target);
    let mut line = String::with_capacity(64);
    let _ = writeln!(
        line,
        "[{:7.3}s {:>5} {}] {}",
        elapsed.as_secs_f64(),
        level,
        target,
        args
    );
    line
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. `level` applies to the tailorx crates.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        own_level: level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` overrides the default filter of `info` for the tailorx crates
/// and `warn` elsewhere. Closed spans are reported with their timings.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACING_FILTER));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
