use alloy_primitives::{B256, U256};
use async_trait::async_trait;
use lotsync_primitives::{Entry, EntryKey, LotId};
use serde::{Deserialize, Serialize};

use crate::errors::StoreResult;

/// Proof that a mutation was durably accepted by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationReceipt {
    pub tx_hash: B256,
}

/// The consumer contract surface used to read and write lots.
///
/// Every mutation resolves only once the store has accepted it. Lot getters
/// fail with [`StoreError::LotNotInserted`](crate::StoreError::LotNotInserted)
/// on a lot that does not exist.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Lots currently holding at least one entry.
    async fn lots(&self) -> StoreResult<Vec<LotId>>;

    async fn lot_is_inserted(&self, lot: LotId) -> StoreResult<bool>;

    /// Keys of the lot in storage order.
    async fn entry_map_keys(&self, lot: LotId) -> StoreResult<Vec<EntryKey>>;

    async fn entry_is_inserted(&self, lot: LotId, key: EntryKey) -> StoreResult<bool>;

    async fn get_entry(&self, lot: LotId, key: EntryKey) -> StoreResult<Entry>;

    /// Inserts or updates a single entry.
    async fn set_entry(&self, lot: LotId, key: EntryKey, entry: &Entry) -> StoreResult<MutationReceipt>;

    /// Inserts or updates `entries[i]` under `keys[i]` in one call.
    async fn set_entries(
        &self,
        lot: LotId,
        keys: &[EntryKey],
        entries: &[Entry],
    ) -> StoreResult<MutationReceipt>;

    async fn remove_entry(&self, lot: LotId, key: EntryKey) -> StoreResult<MutationReceipt>;

    async fn remove_entries(&self, lot: LotId, keys: &[EntryKey]) -> StoreResult<MutationReceipt>;

    /// Removes every entry of the lot along with its upkeep state.
    async fn remove_lot(&self, lot: LotId) -> StoreResult<MutationReceipt>;

    async fn is_upkeep_allowed(&self, lot: LotId) -> StoreResult<bool>;

    async fn set_is_upkeep_allowed(&self, lot: LotId, allowed: bool) -> StoreResult<MutationReceipt>;

    /// Timestamp of the last request made for the entry, zero if none.
    async fn last_request_timestamp(&self, lot: LotId, key: EntryKey) -> StoreResult<U256>;

    async fn set_last_request_timestamps(
        &self,
        lot: LotId,
        keys: &[EntryKey],
        timestamps: &[U256],
    ) -> StoreResult<MutationReceipt>;

    /// Round id of the latest upkeep run, shared by all lots.
    async fn latest_round_id(&self) -> StoreResult<U256>;
}
