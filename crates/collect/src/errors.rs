use std::{io, path::PathBuf};

use alloy_primitives::B256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("only one of callback selectors or callback names may be given")]
    SelectorsAndNames,

    #[error("callback name '{0}' matches no registered decoder")]
    UnresolvedName(String),

    #[error("log in tx {tx_hash} at index {log_index} is not a ChainlinkFulfilled event")]
    NotAFulfillment { tx_hash: B256, log_index: u64 },

    #[error("malformed ChainlinkFulfilled log in tx {tx_hash} at index {log_index}: {source}")]
    MalformedLog {
        tx_hash: B256,
        log_index: u64,
        #[source]
        source: alloy_sol_types::Error,
    },

    #[error("failed to read logs from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed logs file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("log source: {0}")]
    Source(String),
}
