#![deny(missing_docs)]
//! Shared logging utilities for the tubeport workspace.
//!
//! The `client_*` macros forward to the `log` facade so library crates never
//! depend on a concrete logger. The terminal app picks the destination and
//! level once at startup through [`initialize`].

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    ThreadLogMode, WriteLogger,
};

/// File written by [`LogDestination::File`] and [`LogDestination::Both`].
pub const LOG_FILE_NAME: &str = "tubeport.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! client_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! client_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! client_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! client_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! client_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// The terminal; progress output shares it, so keep the level low.
    #[default]
    Terminal,
    /// [`LOG_FILE_NAME`] in the working directory, truncated on start.
    File,
    /// Terminal and file at the same level.
    Both,
}

impl LogDestination {
    fn writes_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    fn writes_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// HTTP stack crates whose connection chatter drowns out the client's own
/// records at debug level.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "h2", "rustls"];

/// Parses a level name such as `debug` or `WARN`.
///
/// Returns `None` for unknown names so callers can fall back to a default.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

/// Installs the global logger. Safe to call when a logger already exists.
///
/// When the log file cannot be created, [`LogDestination::Both`] degrades to
/// the terminal and [`LogDestination::File`] logs nothing.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination.writes_terminal() {
        loggers.push(TermLogger::new(
            level,
            client_config(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        let log_path = PathBuf::from(".").join(LOG_FILE_NAME);
        match File::create(&log_path) {
            Ok(file) => loggers.push(WriteLogger::new(level, client_config(), file)),
            Err(err) => eprintln!("Warning: could not create {}: {err}", log_path.display()),
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

/// Installs a terminal logger for tests; later calls are no-ops.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        client_config(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}

/// RFC 3339 timestamps, thread names (the engine runs on its own thread),
/// and the HTTP stack filtered out.
fn client_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Names);
    for &target in QUIET_TARGETS {
        builder.add_filter_ignore_str(target);
    }
    builder.build()
}
