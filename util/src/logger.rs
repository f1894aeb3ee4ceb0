//! Generic logger utility functions
//!
//! The grid and decomposition modules log at `trace` for every cell, which drowns out everything
//! else in a full bake. Their levels are capped separately from the global level, see
//! [`MODULE_LEVELS_ENV_VAR`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use fern;
use log::{self, info};
use std::env;
use std::str::FromStr;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable overriding the per-module levels, formatted as
/// `module=level,module=level`.
pub const MODULE_LEVELS_ENV_VAR: &str = "COV_LOG_MODULES";

/// Per-module levels used when the environment variable is not set.
pub const DEFAULT_MODULE_LEVELS: &str = "cov_lib::grid=debug,cov_lib::coverage=debug";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level less than `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("Invalid module level `{0}`, expected `module=level`")]
    InvalidModuleLevel(String),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Notes
///
/// - `min_level` must be greater than `log::Level::Info`.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: self::LevelFilter,
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let module_levels = match env::var(MODULE_LEVELS_ENV_VAR) {
        Ok(s) => parse_module_levels(&s)?,
        Err(_) => parse_module_levels(DEFAULT_MODULE_LEVELS)?,
    };

    // Setup the logger using fern's builder pattern
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            // If debug or trace include the target, otherwise don't include it
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    message
                ))
            }
        })
        .level(min_level);

    // A module is never more verbose than the global level
    for (module, level) in module_levels.iter() {
        dispatch = dispatch.level_for(module.clone(), (*level).min(min_level));
    }

    dispatch
        .chain(std::io::stdout())
        .chain(
            fern::log_file(session.log_file_path.clone())
                .map_err(LoggerInitError::LogFileInitError)?,
        )
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);
    for (module, level) in module_levels.iter() {
        info!("    Level for {}: {:?}", module, (*level).min(min_level));
    }

    Ok(())
}

/// Parse a list of per-module levels, formatted as `module=level,module=level`.
pub fn parse_module_levels(s: &str) -> Result<Vec<(String, LevelFilter)>, LoggerInitError> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(2, '=');

            match (parts.next(), parts.next()) {
                (Some(module), Some(level)) if !module.trim().is_empty() => {
                    LevelFilter::from_str(level.trim())
                        .map(|l| (module.trim().to_string(), l))
                        .map_err(|_| LoggerInitError::InvalidModuleLevel(entry.to_string()))
                }
                _ => Err(LoggerInitError::InvalidModuleLevel(entry.to_string())),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info => "INF".normal(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
