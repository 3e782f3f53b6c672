use std::{fs, path::Path};

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::debug;

use crate::{
    errors::CollectError,
    event::{FulfillmentEvent, RawLog},
    filter::{BlockSelector, EventFilter},
};

/// Source of past `ChainlinkFulfilled` events of one consumer.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait FulfillmentLogSource: Send + Sync {
    /// Events passing `filter` within `blocks`, ordered by block then log
    /// index.
    async fn query(
        &self,
        filter: &EventFilter,
        blocks: &BlockSelector,
    ) -> Result<Vec<FulfillmentEvent>, CollectError>;
}

/// Logs held in memory, typically loaded from a JSON export.
#[derive(Clone, Debug, Default)]
pub struct MemLogSource {
    consumer: Option<Address>,
    logs: Vec<RawLog>,
}

impl MemLogSource {
    pub fn new(logs: Vec<RawLog>) -> Self {
        Self {
            consumer: None,
            logs,
        }
    }

    /// Reads a JSON array of [`RawLog`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CollectError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CollectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(serde_json::from_str(&raw)?))
    }

    /// Only keeps logs emitted by `consumer`.
    pub fn with_consumer(mut self, consumer: Address) -> Self {
        self.consumer = Some(consumer);
        self
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

#[async_trait]
impl FulfillmentLogSource for MemLogSource {
    async fn query(
        &self,
        filter: &EventFilter,
        blocks: &BlockSelector,
    ) -> Result<Vec<FulfillmentEvent>, CollectError> {
        let mut events = self
            .logs
            .iter()
            .filter(|log| self.consumer.map_or(true, |consumer| log.address == consumer))
            .filter(|log| blocks.contains(log.block_number, &log.block_hash))
            .filter(|log| filter.matches_topics(&log.topics))
            .map(FulfillmentEvent::from_log)
            .collect::<Result<Vec<_>, _>>()?;
        events.sort_by_key(|event| (event.block_number, event.log_index));
        debug!(scanned = self.logs.len(), matched = events.len(), "queried fulfillment logs");
        Ok(events)
    }
}
