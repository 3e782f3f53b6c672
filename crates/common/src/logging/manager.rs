//! Logging initialization and shutdown management.

use std::{env, io, sync::OnceLock};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::*;
use tracing_appender::{non_blocking::WorkerGuard, rolling::RollingFileAppender};
use tracing_subscriber::{
    filter::{Directive, ParseError},
    fmt::layer,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

use super::types::LoggerConfig;

/// Guard of the non-blocking file writer, dropped on [`finalize`] to flush it.
static FILE_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Builds the level filter: `RUST_LOG` when set, otherwise `default` or
/// `info`.
pub fn build_filter(default: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let has_env = env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    if let (Some(default), false) = (default, has_env) {
        for directive in default.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let parsed: Directive =
                directive
                    .parse()
                    .map_err(|source| LoggingError::InvalidFilter {
                        directive: directive.to_owned(),
                        source,
                    })?;
            filter = filter.add_directive(parsed);
        }
    }
    Ok(filter)
}

/// Initializes the logging subsystem with the provided config.
pub fn init(config: LoggerConfig) -> Result<(), LoggingError> {
    let filt = build_filter(config.filter.as_deref())?;

    let stdout_sub = if config.stdout_config.json_format {
        layer()
            .json()
            .with_writer(io::stderr)
            .with_span_events(config.stdout_config.fmt_span.clone())
            .boxed()
    } else {
        layer()
            .compact()
            .with_writer(io::stderr)
            .with_span_events(config.stdout_config.fmt_span.clone())
            .boxed()
    };

    let file_layer = config.file_logging_config.as_ref().map(|file_config| {
        let file_appender = RollingFileAppender::new(
            file_config.rotation.clone(),
            &file_config.directory,
            &file_config.file_name_prefix,
        );
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        *FILE_GUARD.get_or_init(|| Mutex::new(None)).lock() = Some(guard);

        if file_config.json_format {
            layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                    .boxed()
        } else {
            layer()
                .compact()
                .with_writer(writer)
                .with_ansi(false)
                    .boxed()
        }
    });

    tracing_subscriber::registry()
        .with(filt)
        .with(stdout_sub)
        .with(file_layer)
        .try_init()?;

    debug!(service_name = %config.service_name, "logging initialized");
    Ok(())
}

/// Flushes buffered file output. Call before exiting.
pub fn finalize() {
    debug!("shutting down logging");

    match FILE_GUARD.get().and_then(|guard| guard.lock().take()) {
        Some(guard) => drop(guard),
        None => trace!("no file writer to flush"),
    }
}
