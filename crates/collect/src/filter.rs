//! Topic and block filters for fulfillment log queries.

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolEvent;
use lotsync_primitives::Selector;
use serde::{Deserialize, Serialize};

use crate::event::{ChainlinkFulfilled, FulfillmentEvent};

/// Indexed topic filter. An empty set matches any value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    pub request_ids: Vec<B256>,
    pub callback_addrs: Vec<Address>,
    pub selectors: Vec<Selector>,
}

impl EventFilter {
    /// Topic sets in log order, the event signature first.
    pub fn topics(&self) -> [Vec<B256>; 4] {
        [
            vec![ChainlinkFulfilled::SIGNATURE_HASH],
            self.request_ids.clone(),
            self.callback_addrs.iter().map(|addr| addr.into_word()).collect(),
            self.selectors.iter().map(selector_topic).collect(),
        ]
    }

    /// Whether a raw topic list passes the filter, as a node would apply it.
    pub fn matches_topics(&self, topics: &[B256]) -> bool {
        self.topics()
            .iter()
            .enumerate()
            .all(|(i, set)| set.is_empty() || topics.get(i).is_some_and(|t| set.contains(t)))
    }

    pub fn matches(&self, event: &FulfillmentEvent) -> bool {
        (self.request_ids.is_empty() || self.request_ids.contains(&event.request_id))
            && (self.callback_addrs.is_empty() || self.callback_addrs.contains(&event.callback_addr))
            && (self.selectors.is_empty()
                || self.selectors.contains(&event.callback_function_signature))
    }
}

/// Selectors are left aligned in their topic word.
fn selector_topic(selector: &Selector) -> B256 {
    let mut word = B256::ZERO;
    word[..4].copy_from_slice(selector.as_slice());
    word
}

/// Which blocks to search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockSelector {
    /// Inclusive range, open ended without `to`.
    Range { from: u64, to: Option<u64> },
    Hash(B256),
}

impl Default for BlockSelector {
    fn default() -> Self {
        Self::Range { from: 0, to: None }
    }
}

impl BlockSelector {
    pub fn contains(&self, block_number: u64, block_hash: &B256) -> bool {
        match self {
            Self::Range { from, to } => {
                block_number >= *from && to.map_or(true, |to| block_number <= to)
            }
            Self::Hash(hash) => hash == block_hash,
        }
    }
}
