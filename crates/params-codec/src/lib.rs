//! Encodes typed request parameters into the CBOR buffer carried by a
//! Chainlink request.
//!
//! The buffer is the body of a CBOR map: parameters are appended as
//! `name, value` pairs in declaration order, which is how the on-chain
//! `Chainlink.Request` buffer is built and how the node reads it back.

mod abi;
mod cbor;
mod encoder;
mod errors;
mod param;

pub use encoder::{as_cbor_map, encode_request_params};
pub use errors::{EncodingError, ParamError};
pub use param::{ParamKind, RequestParameter};
