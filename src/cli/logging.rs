//! Logger setup for the binaries.

use crate::cli::LogArgs;
use anyhow::{Context, bail};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

/// Parses a log level name, ignoring case.
///
/// Besides the `log` crate's names, `WARNING` and `CRITICAL` are accepted
/// as aliases of `WARN` and `ERROR`.
pub fn parse_level(level: &str) -> anyhow::Result<LevelFilter> {
    let level = level.trim();
    if let Ok(filter) = level.parse::<LevelFilter>() {
        return Ok(filter);
    }
    match level.to_ascii_uppercase().as_str() {
        "WARNING" => Ok(LevelFilter::Warn),
        "CRITICAL" => Ok(LevelFilter::Error),
        _ => bail!("Invalid log level: {level}"),
    }
}

/// Installs the global logger: terminal by default, a file if requested.
///
/// # Errors
/// Fails on an unknown level, if the log file cannot be created or if a
/// logger is already installed.
pub fn init_logging(args: &LogArgs) -> anyhow::Result<()> {
    let level = parse_level(&args.level)?;
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    match &args.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create log file {}", path.display()))?;
            WriteLogger::init(level, config, file)?;
        }
        None => {
            TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("Warning").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("CRITICAL").unwrap(), LevelFilter::Error);
        assert!(parse_level("loud").is_err());
    }
}
