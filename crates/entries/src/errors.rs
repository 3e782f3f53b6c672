use std::{io, path::PathBuf};

use lotsync_params_codec::EncodingError;
use thiserror::Error;

/// The entries file could not be loaded. Nothing is returned in that case.
#[derive(Debug, Error)]
pub enum EntriesFileError {
    #[error("failed to read entries file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed entries json at line {line}, column {column}: {source}")]
    Malformed {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for EntriesFileError {
    fn from(source: serde_json::Error) -> Self {
        Self::Malformed {
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// First offending field of an invalid entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid entry at index {index}: '{field}' = {value}: {reason}")]
pub struct ValidationError {
    pub index: usize,
    pub field: String,
    pub value: String,
    pub reason: InvalidReason,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("not an EIP-55 checksummed address")]
    NotChecksummed,

    #[error("zero address is not allowed")]
    ZeroAddress,

    #[error("not a UUID")]
    NotUuid,

    #[error("must be a positive integer")]
    NotPositive,

    #[error("must be a non-negative integer")]
    NotNonNegative,

    #[error("exceeds the LINK total supply")]
    AboveTotalSupply,

    #[error("must not be empty")]
    Empty,

    #[error("expected 0 (oracle) or 1 (operator)")]
    UnknownRequestType,

    #[error("unsupported parameter type")]
    UnsupportedParamType,

    #[error("must not be null or an object")]
    InvalidParamValue,

    #[error("needs an array value and 'valueTypes' of the same length")]
    ValueTypesMismatch,

    #[error("'valueTypes' is only allowed for 'bytes' and 'bytes_packed'")]
    UnexpectedValueTypes,

    #[error("unknown external adapter")]
    UnknownAdapter,

    #[error("expected a 'major.minor.patch' version")]
    BadVersion,

    #[error("expected chain id {expected}")]
    ChainIdMismatch { expected: u64 },

    #[error("unknown node id")]
    UnknownNode,

    #[error("(jobId, jobCase) already used by the entry at index {first}")]
    DuplicateJob { first: usize },
}

/// An entry that could not be turned into its stored form.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to encode the request params of the entry at index {index}: {source}")]
    Encoding {
        index: usize,
        #[source]
        source: EncodingError,
    },
}
