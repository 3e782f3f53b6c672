use std::path::PathBuf;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Default value for `batch_size` in [`SyncConfig`].
const DEFAULT_BATCH_SIZE: usize = 50;

/// The consumer contract being managed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Address of the deployed consumer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// Chain every declared entry must target. Unchecked when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Submit mutations in chunks instead of one call per entry.
    #[serde(default = "default_batch")]
    pub batch: bool,

    /// Maximum entries per chunk. `0` submits every entry in one chunk.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch: default_batch(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject files declaring the same `(jobId, jobCase)` twice.
    #[serde(default = "default_unique_job_ids")]
    pub unique_job_ids: bool,

    /// Node ids accepted on top of the built-in list.
    #[serde(default)]
    pub extra_node_ids: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unique_job_ids: default_unique_job_ids(),
            extra_node_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Label appended to the service name, e.g. `lotsync%mainnet`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_label: Option<String>,

    /// Default filter directives. `RUST_LOG` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Directory for rolling log files. File logging is off when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_prefix: Option<String>,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub consumer: ConsumerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_batch() -> bool {
    true
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_unique_job_ids() -> bool {
    true
}
