use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use client_logging::LogDestination;
use log::LevelFilter;
use tubeport_engine::ClientSettings;

pub const ENV_BASE_URL: &str = "TUBEPORT_API_BASE_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "TUBEPORT_POLL_INTERVAL_MS";
pub const ENV_LOG_LEVEL: &str = "TUBEPORT_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "tubeport",
    version,
    about = "Send a video to the processing service and follow it until it is done"
)]
pub struct Cli {
    /// Video URL (watch, short-link or embed form).
    pub url: String,

    /// Base64-encoded cookies sent along with the request.
    #[arg(long)]
    pub cookies: Option<String>,

    /// Netscape cookies.txt file to upload to the service.
    #[arg(long, value_name = "PATH")]
    pub cookie_file: Option<PathBuf>,

    /// Service root. Overrides TUBEPORT_API_BASE_URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Delay between status checks. Overrides TUBEPORT_POLL_INTERVAL_MS.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Where log records go. `file` and `both` write ./tubeport.log.
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

pub fn init_logging(cli: &Cli) {
    let (destination, level) = log_setup(cli, |key| std::env::var(key).ok());
    client_logging::initialize(destination, level);
}

/// The terminal carries progress output, so it defaults to warnings only.
/// A log file defaults to info.
fn log_setup(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> (LogDestination, LevelFilter) {
    let destination = LogDestination::from(cli.log);
    let default_level = match destination {
        LogDestination::Terminal => LevelFilter::Warn,
        LogDestination::File | LogDestination::Both => LevelFilter::Info,
    };
    let level = env(ENV_LOG_LEVEL)
        .and_then(|name| client_logging::parse_level(&name))
        .unwrap_or(default_level);
    (destination, level)
}

/// Defaults, then environment, then command-line flags.
pub fn client_settings(
    cli: &Cli,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Some(base_url) = cli.base_url.clone().or_else(|| env(ENV_BASE_URL)) {
        settings.base_url = base_url;
    }

    let poll_ms = match cli.poll_interval_ms {
        Some(ms) => Some(ms),
        None => env(ENV_POLL_INTERVAL_MS)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{ENV_POLL_INTERVAL_MS}={raw:?} is not a number"))
            })
            .transpose()?,
    };
    if let Some(ms) = poll_ms {
        if ms == 0 {
            bail!("poll interval must be greater than zero");
        }
        settings.poll_interval = Duration::from_millis(ms);
    }

    settings
        .validate()
        .with_context(|| format!("unusable service url {:?}", settings.base_url))?;
    Ok(settings)
}
