//! Collection of past `ChainlinkFulfilled` events and decoding of their
//! payloads through a [`DecoderRegistry`](lotsync_decoders::DecoderRegistry).

mod collector;
mod errors;
mod event;
mod filter;
mod source;
#[cfg(test)]
mod test_utils;

pub use collector::{CollectRequest, CollectedRecord, Collector};
pub use errors::CollectError;
pub use event::{ChainlinkFulfilled, FulfillmentEvent, RawLog};
pub use filter::{BlockSelector, EventFilter};
#[cfg(any(test, feature = "test-utils"))]
pub use source::MockFulfillmentLogSource;
pub use source::{FulfillmentLogSource, MemLogSource};
