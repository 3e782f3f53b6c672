use std::fmt::Debug;

use thiserror::Error;

/// Failure of a single decoder against a payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("abi decoding failed: {0}")]
    Abi(#[from] alloy_dyn_abi::Error),

    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: String,
    },

    #[error("payload of {len} bytes is shorter than the {needed} bytes required")]
    Truncated { needed: usize, len: usize },

    #[error("timestamp {0} is out of the representable range")]
    TimestampOutOfRange(String),
}

impl DecodeError {
    pub(crate) fn shape(expected: &'static str, found: impl Debug) -> Self {
        Self::UnexpectedShape {
            expected,
            found: format!("{found:?}"),
        }
    }
}

/// Errors raised while building a registry from a catalogue.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("signature '{0}' has no parameter list")]
    MissingParameters(&'static str),

    #[error("invalid layout '{layout}' for '{signature}': {source}")]
    InvalidLayout {
        signature: &'static str,
        layout: &'static str,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    #[error("layout '{layout}' for '{signature}' is not a tuple starting with the request id")]
    LayoutWithoutRequestId {
        signature: &'static str,
        layout: &'static str,
    },
}
