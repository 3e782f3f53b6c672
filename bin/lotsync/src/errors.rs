use std::io;

use lotsync_common::logging::LoggingError;
use lotsync_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum InitError {
    #[error("config: {0}")]
    MalformedConfig(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("building runtime: {0}")]
    RuntimeBuild(#[source] io::Error),
}
