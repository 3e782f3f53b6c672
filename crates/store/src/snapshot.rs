//! JSON capture of a store's state.

use alloy_primitives::{Address, U256};
use lotsync_primitives::{serde_helpers::u256_dec, Entry, EntryKey, LotId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StoreSnapshot {
    /// Address of the consumer contract.
    pub address: Address,
    /// Addresses holding code, i.e. valid oracles and callbacks.
    #[serde(default)]
    pub contracts: Vec<Address>,
    #[serde(default, with = "u256_dec")]
    pub latest_round_id: U256,
    #[serde(default)]
    pub lots: Vec<LotSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LotSnapshot {
    #[serde(with = "u256_dec")]
    pub lot: LotId,
    #[serde(default)]
    pub is_upkeep_allowed: bool,
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_request_timestamps: Vec<TimestampSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimestampSnapshot {
    pub key: EntryKey,
    #[serde(with = "u256_dec")]
    pub timestamp: U256,
}
