//! Runtime configuration of the lotsync tool, read from TOML.

mod config;
mod errors;
mod overrides;

pub use config::{Config, ConsumerConfig, LoggingConfig, SyncConfig, ValidationConfig};
pub use errors::ConfigError;
pub use overrides::{apply_override, load_config, load_config_value, parse_override};
