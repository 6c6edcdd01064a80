//! Optional `fern` logging for hosts embedding the secrets client.
//!
//! The client core only emits `log` records. A host without a logger of its own
//! calls [`initialize`] once at startup with the `[logging]` table of its
//! [`ClientConfig`](crate::config::ClientConfig), or lets
//! [`SecretsManagerClient::from_config_dir`](crate::SecretsManagerClient::from_config_dir)
//! do it. Access tokens and secret values never reach a log record.

use crate::config::{LoggingConfig, default_config_dir};
use crate::error::LoggerError;

use std::fs::create_dir_all;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339_millis;
use log::{LevelFilter, debug, info};

/// Crates whose records follow the configured level.
const CLIENT_TARGETS: [&str; 3] = ["sm_client_core", "sm_models", "sm_common"];

const LOG_FILE_NAME: &str = "secrets-client.log";

static LOGGER_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install stdout and/or file logging as described by `config`.
///
/// Later calls after a successful one do nothing. A failed call installs
/// nothing and may be retried with a corrected config.
///
/// # Errors
///
/// - [`LoggerError::InvalidLevel`] when `config.level` is not a log level
/// - [`LoggerError::Output`] when the log directory or file cannot be created
/// - [`LoggerError::Initialize`] when another global logger is already installed
pub fn initialize(config: &LoggingConfig) -> Result<(), LoggerError> {
    let level: LevelFilter = config
        .level
        .parse()
        .map_err(|_| LoggerError::invalid_level(config.level.as_str()))?;

    if !config.stdout && !config.file {
        return Ok(());
    }

    if LOGGER_INSTALLED.swap(true, Ordering::SeqCst) {
        debug!("Logger already initialized");
        return Ok(());
    }

    let installed = dispatch(config, level).and_then(|(dispatch, log_file)| {
        dispatch
            .apply()
            .map_err(|e| LoggerError::initialize(format!("cannot install logger: {e}")))?;
        Ok(log_file)
    });

    match installed {
        Ok(Some(log_file)) => info!("Logging at {level} to {}", log_file.display()),
        Ok(None) => info!("Logging at {level} to stdout"),
        Err(e) => {
            LOGGER_INSTALLED.store(false, Ordering::SeqCst);
            return Err(e);
        }
    }

    Ok(())
}

fn dispatch(
    config: &LoggingConfig,
    level: LevelFilter,
) -> Result<(Dispatch, Option<PathBuf>), LoggerError> {
    let mut root = CLIENT_TARGETS
        .iter()
        .fold(Dispatch::new().level(LevelFilter::Warn), |root, target| {
            root.level_for(*target, level)
        });

    if config.stdout {
        root = root.chain(stdout_output());
    }

    let mut log_file = None;
    if config.file {
        let path = log_file_path(config)?;
        let file = fern::log_file(&path)
            .map_err(|e| LoggerError::output(&path, format!("cannot open log file: {e}")))?;
        root = root.chain(file_output().chain(file));
        log_file = Some(path);
    }

    Ok((root, log_file))
}

fn log_file_path(config: &LoggingConfig) -> Result<PathBuf, LoggerError> {
    let dir = match &config.log_dir {
        Some(dir) => dir.clone(),
        None => default_config_dir().map_err(|e| LoggerError::initialize(e.to_string()))?,
    };

    create_dir_all(&dir)
        .map_err(|e| LoggerError::output(&dir, format!("cannot create log directory: {e}")))?;

    Ok(dir.join(LOG_FILE_NAME))
}

fn stdout_output() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Red)
        .warn(Yellow)
        .info(Green)
        .debug(Blue)
        .trace(Magenta);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{level} {target}: {message}",
                level = colors.color(record.level()),
                target = record.target(),
            ))
        })
        .chain(stdout())
}

fn file_output() -> Dispatch {
    Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{date} {level:<5} {target} ({file}:{line}) {message}",
            date = format_rfc3339_millis(SystemTime::now()),
            level = record.level(),
            target = record.target(),
            file = record.file().unwrap_or("?"),
            line = record.line().unwrap_or(0),
        ))
    })
}
