//! Decoding of oracle fulfillment payloads.
//!
//! A [`DecoderRegistry`] is built once from a [`CatalogueEntry`] table and
//! maps each callback selector to the decoder of its argument list.

mod catalogue;
mod errors;
mod post;
mod registry;
mod value;

pub use catalogue::{CatalogueEntry, PostProcess, CATALOGUE};
pub use errors::{DecodeError, RegistryError};
pub use registry::{Decoded, DecodeFailure, DecoderRegistry, FallbackOutcome, RegisteredDecoder};
pub use value::{DecodedValue, MAX_SAFE_INTEGER};
