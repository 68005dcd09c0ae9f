//! tracing subscriber setup shared by both binaries

use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives, e.g. `UNICONV_LOG=debug`.
pub const LOG_ENV: &str = "UNICONV_LOG";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Where log events end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// No subscriber is installed
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Number of `-v` flags given
    pub verbosity: u8,
    pub quiet: bool,
    pub target: LogTarget,
}

impl LogConfig {
    pub fn stderr(verbosity: u8, quiet: bool) -> Self {
        Self {
            verbosity,
            quiet,
            target: LogTarget::Stderr,
        }
    }

    /// Default level when `UNICONV_LOG` is unset.
    pub fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(self.level().into())
            .with_env_var(LOG_ENV)
            .from_env_lossy()
    }
}

/// Install the global subscriber.
///
/// Reports all the log events sent either with the `log` crate or the
/// `tracing` crate.
pub fn init(config: &LogConfig) -> Result<()> {
    let timer = ChronoUtc::new(TIME_FORMAT.into());

    match &config.target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(config.filter())
            .with_timer(timer)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init()
            .map_err(|err| anyhow!("Failed to install the log subscriber: {}", err)),
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(config.filter())
                .with_timer(timer)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|err| anyhow!("Failed to install the log subscriber: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(LogConfig::stderr(0, false).level(), LevelFilter::WARN);
        assert_eq!(LogConfig::stderr(1, false).level(), LevelFilter::INFO);
        assert_eq!(LogConfig::stderr(2, false).level(), LevelFilter::DEBUG);
        assert_eq!(LogConfig::stderr(7, false).level(), LevelFilter::TRACE);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(LogConfig::stderr(3, true).level(), LevelFilter::ERROR);
    }

    #[test]
    fn test_off_installs_nothing() {
        let config = LogConfig {
            verbosity: 0,
            quiet: false,
            target: LogTarget::Off,
        };
        assert!(init(&config).is_ok());
    }

    #[test]
    fn test_second_install_is_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = LogConfig {
            verbosity: 0,
            quiet: false,
            target: LogTarget::File(temp_dir.path().join("uniconv.log")),
        };
        // The first call may already lose to another test's subscriber
        let _ = init(&config);
        let err = init(&config).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to install the log subscriber"));
    }

    #[test]
    fn test_unwritable_log_file_is_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = LogConfig {
            verbosity: 0,
            quiet: false,
            target: LogTarget::File(temp_dir.path().join("missing").join("uniconv.log")),
        };
        let err = init(&config).unwrap_err();
        assert!(err.to_string().starts_with("Failed to open log file"));
    }
}
