//! Errors raised while building primitives from untrusted input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitivesError {
    #[error("invalid request type {0}, expected 0 (oracle) or 1 (operator)")]
    InvalidRequestType(u8),

    #[error("invalid decimal integer '{0}'")]
    InvalidDecimal(String),
}
