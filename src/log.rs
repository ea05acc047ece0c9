//! The `log` module provides initialisation and configuration of the program logger.
//!
//! Messages are written to stderr, prefixed with a timestamp, the level and the module they came
//! from. The log level can be set in the settings file or overridden with the
//! `COMMODITY_BALANCE_LOG_LEVEL` environment variable.
use anyhow::{Result, bail};
use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::env;
use std::sync::OnceLock;

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the
/// `COMMODITY_BALANCE_LOG_LEVEL` environment variable or the settings file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable which overrides the log level from the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "COMMODITY_BALANCE_LOG_LEVEL";

/// Set once the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger using the `fern` logging library.
///
/// The user can override the specified log level with the `COMMODITY_BALANCE_LOG_LEVEL`
/// environment variable.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
pub fn init(log_level_from_settings: &str) -> Result<()> {
    // Retrieve the log level from the environment variable or settings, or use the default
    let log_level =
        env::var(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| log_level_from_settings.to_string());
    let log_level = parse_log_level(&log_level)?;

    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(log_level)
        .chain(std::io::stderr())
        .apply()?;

    // Setting the logger a second time fails above, so this always succeeds
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Convert a log level name (case-insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("info", LevelFilter::Info)]
    #[case("DEBUG", LevelFilter::Debug)]
    #[case("Warn", LevelFilter::Warn)]
    #[case("off", LevelFilter::Off)]
    fn parse_log_level_works(#[case] name: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(name).unwrap(), expected);
    }

    #[test]
    fn parse_log_level_unknown() {
        assert_eq!(
            parse_log_level("loud").unwrap_err().to_string(),
            "Unknown log level: loud"
        );
    }
}
