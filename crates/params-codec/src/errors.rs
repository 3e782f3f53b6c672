use std::convert::Infallible;

use alloy_dyn_abi::Error as AbiError;
use minicbor::encode::Error as CborError;
use serde_json::Value;
use thiserror::Error;

/// A parameter that could not be encoded, with its position in the list.
#[derive(Debug, Error)]
#[error("request param {index} ('{name}'): {reason}")]
pub struct EncodingError {
    pub index: usize,
    pub name: String,
    #[source]
    pub reason: ParamError,
}

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("empty name")]
    EmptyName,

    #[error("unsupported type '{0}'")]
    UnsupportedType(String),

    #[error("{values} values but {types} value types")]
    ArityMismatch { values: usize, types: usize },

    #[error("value types are only allowed for 'bytes' and 'bytes_packed'")]
    UnexpectedValueTypes,

    #[error("invalid value {value} for '{expected}'")]
    InvalidValue { expected: String, value: Value },

    #[error("abi encoding: {0}")]
    Abi(#[from] AbiError),

    #[error("cbor: {0}")]
    Cbor(#[from] CborError<Infallible>),
}

impl ParamError {
    pub(crate) fn invalid(expected: impl Into<String>, value: &Value) -> Self {
        Self::InvalidValue {
            expected: expected.into(),
            value: value.clone(),
        }
    }
}
