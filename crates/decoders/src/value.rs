//! Structured values produced by decoders.

use std::fmt;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{hex, I256, U256};
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

use crate::errors::DecodeError;

/// Largest integer a JSON reader represents exactly, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Human readable result of a decoder.
///
/// Integers within [`MAX_SAFE_INTEGER`] serialize as JSON numbers, larger ones
/// as decimal strings. Bytes are rendered as `0x` prefixed hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<DecodedValue>),
}

impl DecodedValue {
    pub fn uint(value: U256) -> Self {
        match u64::try_from(value) {
            Ok(small) if small <= MAX_SAFE_INTEGER => Self::Number(small as i64),
            _ => Self::Text(value.to_string()),
        }
    }

    pub fn int(value: I256) -> Self {
        match u64::try_from(value.unsigned_abs()) {
            Ok(small) if small <= MAX_SAFE_INTEGER => {
                let magnitude = small as i64;
                Self::Number(if value.is_negative() { -magnitude } else { magnitude })
            }
            _ => Self::Text(value.to_string()),
        }
    }

    /// Unsigned big-endian integer packed in a byte slice of at most 32 bytes.
    pub fn uint_be(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::uint(be_u256(bytes)?))
    }

    pub fn hex(bytes: impl AsRef<[u8]>) -> Self {
        Self::Text(hex::encode_prefixed(bytes))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Text of a byte slice, replacing invalid UTF-8 sequences.
    pub fn utf8(bytes: &[u8]) -> Self {
        Self::Text(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Hex of a byte slice followed by its text with NUL padding removed,
    /// e.g. `0x004c414c (LAL)`.
    pub fn labelled_hex(bytes: &[u8]) -> Self {
        let label = String::from_utf8_lossy(bytes).replace('\0', "");
        Self::Text(format!("{} ({label})", hex::encode_prefixed(bytes)))
    }

    /// Unix seconds along with their UTC date, e.g.
    /// `1672531200 (2023-01-01T00:00:00.000Z)`.
    pub fn timestamp(seconds: U256) -> Result<Self, DecodeError> {
        let date = i64::try_from(seconds)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| DecodeError::TimestampOutOfRange(seconds.to_string()))?;
        Ok(Self::Text(format!(
            "{seconds} ({})",
            date.to_rfc3339_opts(SecondsFormat::Millis, true)
        )))
    }

    /// Same as [`Self::timestamp`] for seconds packed big-endian in bytes.
    pub fn timestamp_be(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::timestamp(be_u256(bytes)?)
    }
}

fn be_u256(bytes: &[u8]) -> Result<U256, DecodeError> {
    U256::try_from_be_slice(bytes).ok_or(DecodeError::Truncated {
        needed: 32,
        len: bytes.len(),
    })
}

impl From<DynSolValue> for DecodedValue {
    fn from(value: DynSolValue) -> Self {
        match value {
            DynSolValue::Bool(flag) => Self::Bool(flag),
            DynSolValue::Int(value, _) => Self::int(value),
            DynSolValue::Uint(value, _) => Self::uint(value),
            DynSolValue::FixedBytes(word, size) => Self::hex(&word[..size.min(32)]),
            DynSolValue::Address(address) => Self::Text(address.to_checksum(None)),
            DynSolValue::Function(function) => Self::hex(function.as_slice()),
            DynSolValue::Bytes(bytes) => Self::hex(bytes),
            DynSolValue::String(text) => Self::Text(text),
            DynSolValue::Array(items)
            | DynSolValue::FixedArray(items)
            | DynSolValue::Tuple(items) => Self::List(items.into_iter().map(Self::from).collect()),
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}
