//! Lot level flows: reading a lot, diffing it and syncing it.

use lotsync_primitives::{Entry, EntryKey, EntryMap, LotId};
use lotsync_reconcile::{reconcile, EntryDiff};
use lotsync_store::{EntryStore, MutationReceipt};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    errors::SyncError,
    executor::{apply_mutations, BatchMode, BatchReport, MutationKind, MutationSet},
};

/// Reads every entry of `lot` in storage order. A lot that is not inserted
/// reads as empty.
pub async fn fetch_lot_entries(store: &impl EntryStore, lot: LotId) -> Result<EntryMap, SyncError> {
    let fetch_err = |source| SyncError::Fetch { lot, source };

    if !store.lot_is_inserted(lot).await.map_err(fetch_err)? {
        debug!(%lot, "lot is not inserted");
        return Ok(EntryMap::new());
    }

    let keys = store.entry_map_keys(lot).await.map_err(fetch_err)?;
    let mut entries = EntryMap::new();
    for (index, key) in keys.into_iter().enumerate() {
        let entry = store.get_entry(lot, key).await.map_err(fetch_err)?;
        entries.insert(entry, Some(index));
    }
    debug!(%lot, count = entries.len(), "fetched lot entries");
    Ok(entries)
}

/// The remote state of a lot and its diff against the local entries.
#[derive(Clone, Debug)]
pub struct LotPlan {
    pub lot: LotId,
    pub remote: EntryMap,
    pub diff: EntryDiff,
}

/// Fetches `lot` and diffs it against `local` without writing anything.
pub async fn plan_lot(
    store: &impl EntryStore,
    lot: LotId,
    local: &EntryMap,
) -> Result<LotPlan, SyncError> {
    let remote = fetch_lot_entries(store, lot).await?;
    let diff = reconcile(local, &remote);
    info!(
        %lot,
        add = diff.to_add.len(),
        remove = diff.to_remove.len(),
        update = diff.to_update.len(),
        unchanged = diff.to_check.len() - diff.to_update.len(),
        "reconciled lot"
    );
    Ok(LotPlan { lot, remote, diff })
}

/// Outcome of [`sync_lot`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub lot: LotId,
    pub diff: EntryDiff,
    pub removed: Option<BatchReport>,
    pub updated: Option<BatchReport>,
    pub added: Option<BatchReport>,
}

impl SyncReport {
    /// Number of store calls made.
    pub fn calls(&self) -> usize {
        [&self.removed, &self.updated, &self.added]
            .into_iter()
            .flatten()
            .map(|report| report.chunks.len())
            .sum()
    }
}

/// Makes `lot` hold exactly the `local` entries.
///
/// Stale entries are removed first, then changed entries are updated and
/// finally new entries are added.
pub async fn sync_lot(
    store: &impl EntryStore,
    lot: LotId,
    local: &EntryMap,
    mode: BatchMode,
) -> Result<SyncReport, SyncError> {
    let LotPlan { remote, diff, .. } = plan_lot(store, lot, local).await?;
    if diff.is_synced() {
        info!(%lot, "lot is in sync, nothing to do");
    }

    let removed = if diff.to_remove.is_empty() {
        None
    } else {
        let set = MutationSet::remove(&diff.to_remove).with_sources(&remote);
        Some(apply_mutations(store, lot, set, mode).await?)
    };

    let updated = upsert(store, lot, local, MutationKind::Update, &diff.to_update, mode).await?;
    let added = upsert(store, lot, local, MutationKind::Add, &diff.to_add, mode).await?;

    Ok(SyncReport {
        lot,
        diff,
        removed,
        updated,
        added,
    })
}

async fn upsert(
    store: &impl EntryStore,
    lot: LotId,
    local: &EntryMap,
    kind: MutationKind,
    keys: &[EntryKey],
    mode: BatchMode,
) -> Result<Option<BatchReport>, SyncError> {
    if keys.is_empty() {
        return Ok(None);
    }
    let entries: Vec<Entry> = local.entries_for(keys).cloned().collect();
    let set = MutationSet::upsert(kind, keys, &entries).with_sources(local);
    Ok(Some(apply_mutations(store, lot, set, mode).await?))
}

/// Removes a whole lot.
pub async fn remove_lot(store: &impl EntryStore, lot: LotId) -> Result<MutationReceipt, SyncError> {
    if !store
        .lot_is_inserted(lot)
        .await
        .map_err(|e| SyncError::from_store(lot, e))?
    {
        return Err(SyncError::LotNotInserted(lot));
    }
    let receipt = store
        .remove_lot(lot)
        .await
        .map_err(|e| SyncError::from_store(lot, e))?;
    info!(%lot, tx_hash = %receipt.tx_hash, "removed lot");
    Ok(receipt)
}

/// Removes a single entry. Removing the last entry also removes the lot.
pub async fn remove_entry(
    store: &impl EntryStore,
    lot: LotId,
    key: EntryKey,
) -> Result<MutationReceipt, SyncError> {
    let store_err = |e| SyncError::from_store(lot, e);
    if !store.lot_is_inserted(lot).await.map_err(store_err)? {
        return Err(SyncError::LotNotInserted(lot));
    }
    if !store.entry_is_inserted(lot, key).await.map_err(store_err)? {
        return Err(SyncError::EntryNotInserted { lot, key });
    }
    let receipt = store.remove_entry(lot, key).await.map_err(store_err)?;
    info!(%lot, %key, tx_hash = %receipt.tx_hash, "removed entry");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use alloy_primitives::{Address, U256};
    use lotsync_primitives::test_utils::sample_entry;
    use lotsync_store::{MemEntryStore, MockEntryStore, MutationCall, StoreError};

    use super::*;
    use crate::errors::MutationError;

    fn lot() -> LotId {
        LotId::from(3u8)
    }

    fn mem_store() -> MemEntryStore {
        let entry = sample_entry(0, 0);
        MemEntryStore::new(Address::repeat_byte(0xcc))
            .with_contracts([entry.oracle, entry.callback_addr])
    }

    async fn seed(store: &MemEntryStore, entries: &[Entry]) {
        let keys: Vec<_> = entries.iter().map(|e| e.key).collect();
        store.set_entries(lot(), &keys, entries).await.unwrap();
    }

    fn local(entries: &[Entry]) -> EntryMap {
        entries
            .iter()
            .enumerate()
            .fold(EntryMap::new(), |mut map, (index, entry)| {
                map.insert(entry.clone(), Some(index));
                map
            })
    }

    fn batched(size: usize) -> BatchMode {
        BatchMode::Batched {
            chunk_size: NonZeroUsize::new(size),
        }
    }

    #[tokio::test]
    async fn test_sync_removes_then_updates_then_adds() {
        let store = mem_store();
        seed(&store, &[sample_entry(0xb, 5), sample_entry(0xc, 3)]).await;
        let local = local(&[sample_entry(0xa, 1), sample_entry(0xb, 2)]);

        let report = sync_lot(&store, lot(), &local, BatchMode::default())
            .await
            .unwrap();
        assert_eq!(report.calls(), 3);

        let calls: Vec<_> = store.journal().iter().skip(1).map(|r| (r.call, r.keys.clone())).collect();
        assert_eq!(
            calls,
            vec![
                (MutationCall::RemoveEntries, vec![sample_entry(0xc, 0).key]),
                (MutationCall::SetEntries, vec![sample_entry(0xb, 0).key]),
                (MutationCall::SetEntries, vec![sample_entry(0xa, 0).key]),
            ]
        );

        let remote = fetch_lot_entries(&store, lot()).await.unwrap();
        assert_eq!(remote.len(), 2);
        assert_eq!(
            remote.get(&sample_entry(0xb, 0).key).unwrap().payment,
            U256::from(2u8)
        );
    }

    #[tokio::test]
    async fn test_second_sync_is_a_no_op() {
        let store = mem_store();
        let local = local(&[sample_entry(1, 1), sample_entry(2, 1), sample_entry(3, 1)]);

        sync_lot(&store, lot(), &local, batched(2)).await.unwrap();
        let calls = store.journal().len();
        assert_eq!(calls, 2);

        let report = sync_lot(&store, lot(), &local, batched(2)).await.unwrap();
        assert!(report.diff.is_synced());
        assert_eq!(report.calls(), 0);
        assert_eq!(store.journal().len(), calls);
    }

    #[tokio::test]
    async fn test_rerun_after_partial_failure_sends_the_rest() {
        let store = mem_store();
        let stranger = Address::repeat_byte(0x99);
        let mut broken = sample_entry(3, 1);
        broken.callback_addr = stranger;
        let entries = [sample_entry(1, 1), sample_entry(2, 1), broken, sample_entry(4, 1)];
        let local = local(&entries);

        let err = sync_lot(&store, lot(), &local, batched(2)).await.unwrap_err();
        match err {
            SyncError::Mutation(MutationError::ChunkFailed {
                kind,
                range,
                applied,
                source,
                ..
            }) => {
                assert_eq!(kind, MutationKind::Add);
                assert_eq!(range, 2..4);
                assert_eq!(applied, 1);
                assert!(matches!(source, StoreError::CallbackAddrIsNotContract { .. }));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(fetch_lot_entries(&store, lot()).await.unwrap().len(), 2);

        let fixed = MemEntryStore::from_snapshot(store.snapshot()).with_contracts([stranger]);
        let report = sync_lot(&fixed, lot(), &local, batched(2)).await.unwrap();
        assert_eq!(report.diff.to_add.len(), 2);
        assert_eq!(report.calls(), 1);
        assert_eq!(fetch_lot_entries(&fixed, lot()).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_emptying_a_lot_purges_it() {
        let store = mem_store();
        seed(&store, &[sample_entry(1, 1)]).await;
        store.set_is_upkeep_allowed(lot(), true).await.unwrap();

        sync_lot(&store, lot(), &EntryMap::new(), BatchMode::Single)
            .await
            .unwrap();
        assert!(!store.lot_is_inserted(lot()).await.unwrap());

        sync_lot(&store, lot(), &local(&[sample_entry(1, 1)]), BatchMode::Single)
            .await
            .unwrap();
        assert!(!store.is_upkeep_allowed(lot()).await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch_missing_lot_is_empty() {
        let store = mem_store();
        assert!(fetch_lot_entries(&store, lot()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_errors_carry_the_lot() {
        let mut store = MockEntryStore::new();
        store.expect_lot_is_inserted().returning(|_| Ok(true));
        store
            .expect_entry_map_keys()
            .returning(|_| Err(StoreError::transport("connection reset")));

        let err = fetch_lot_entries(&store, lot()).await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch { lot: l, .. } if l == lot()));
    }

    #[tokio::test]
    async fn test_remove_lot_and_entry() {
        let store = mem_store();
        assert!(matches!(
            remove_lot(&store, lot()).await.unwrap_err(),
            SyncError::LotNotInserted(_)
        ));

        let entries = [sample_entry(1, 1), sample_entry(2, 1)];
        seed(&store, &entries).await;
        let missing = sample_entry(9, 1).key;
        assert!(matches!(
            remove_entry(&store, lot(), missing).await.unwrap_err(),
            SyncError::EntryNotInserted { key, .. } if key == missing
        ));

        remove_entry(&store, lot(), entries[0].key).await.unwrap();
        remove_lot(&store, lot()).await.unwrap();
        assert!(store.lots().await.unwrap().is_empty());
    }
}
