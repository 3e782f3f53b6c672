//! In-memory entry store enforcing the consumer contract's rules.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    slice,
};

use alloy_primitives::{keccak256, Address, B256, U256};
use async_trait::async_trait;
use lotsync_primitives::{constants::LINK_TOTAL_SUPPLY, Entry, EntryKey, EntryMap, LotId};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    errors::{StoreError, StoreResult},
    snapshot::{LotSnapshot, StoreSnapshot, TimestampSnapshot},
    traits::{EntryStore, MutationReceipt},
};

/// Mutating call recorded by [`MemEntryStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationCall {
    SetEntry,
    SetEntries,
    RemoveEntry,
    RemoveEntries,
    RemoveLot,
    SetIsUpkeepAllowed,
    SetLastRequestTimestamps,
}

/// A mutation accepted by [`MemEntryStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    pub call: MutationCall,
    pub lot: LotId,
    pub keys: Vec<EntryKey>,
    pub tx_hash: B256,
}

#[derive(Debug, Default)]
struct LotState {
    entries: EntryMap,
    is_upkeep_allowed: bool,
    last_request_timestamps: HashMap<EntryKey, U256>,
}

#[derive(Debug, Default)]
struct State {
    lots: BTreeMap<LotId, LotState>,
    latest_round_id: U256,
    journal: Vec<MutationRecord>,
}

/// Entry store kept in memory.
///
/// A lot exists only while it holds entries: removing its last entry drops
/// the lot together with its upkeep flag and request timestamps, so a later
/// insert starts from a clean history. Every call is atomic, a failing call
/// leaves the state untouched.
#[derive(Debug)]
pub struct MemEntryStore {
    address: Address,
    contracts: HashSet<Address>,
    state: Mutex<State>,
}

impl MemEntryStore {
    /// Creates an empty store deployed at `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            contracts: HashSet::new(),
            state: Mutex::new(State::default()),
        }
    }

    /// Marks `contracts` as deployed code, making them valid oracles and
    /// callbacks.
    pub fn with_contracts(mut self, contracts: impl IntoIterator<Item = Address>) -> Self {
        self.contracts.extend(contracts);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new(snapshot.address).with_contracts(snapshot.contracts);
        {
            let mut state = store.state.lock();
            state.latest_round_id = snapshot.latest_round_id;
            for lot in snapshot.lots.into_iter().filter(|lot| !lot.entries.is_empty()) {
                let last_request_timestamps = lot
                    .last_request_timestamps
                    .into_iter()
                    .map(|ts| (ts.key, ts.timestamp))
                    .collect();
                state.lots.insert(
                    lot.lot,
                    LotState {
                        entries: lot.entries.into_iter().collect(),
                        is_upkeep_allowed: lot.is_upkeep_allowed,
                        last_request_timestamps,
                    },
                );
            }
        }
        store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.lock();
        let mut contracts: Vec<_> = self.contracts.iter().copied().collect();
        contracts.sort();
        let lots = state
            .lots
            .iter()
            .map(|(lot, lot_state)| {
                let last_request_timestamps = lot_state
                    .entries
                    .keys()
                    .filter_map(|key| {
                        lot_state
                            .last_request_timestamps
                            .get(key)
                            .map(|timestamp| TimestampSnapshot {
                                key: *key,
                                timestamp: *timestamp,
                            })
                    })
                    .collect();
                LotSnapshot {
                    lot: *lot,
                    is_upkeep_allowed: lot_state.is_upkeep_allowed,
                    entries: lot_state.entries.entries().cloned().collect(),
                    last_request_timestamps,
                }
            })
            .collect();
        StoreSnapshot {
            address: self.address,
            contracts,
            latest_round_id: state.latest_round_id,
            lots,
        }
    }

    /// Mutations accepted so far, oldest first.
    pub fn journal(&self) -> Vec<MutationRecord> {
        self.state.lock().journal.clone()
    }

    pub fn set_latest_round_id(&self, round_id: U256) {
        self.state.lock().latest_round_id = round_id;
    }

    fn check_entry(&self, key: EntryKey, entry: &Entry) -> StoreResult<()> {
        if entry.spec_id.is_zero() {
            return Err(StoreError::SpecIdIsZero { key });
        }
        if entry.oracle == self.address {
            return Err(StoreError::OracleIsConsumer { key });
        }
        if !self.contracts.contains(&entry.oracle) {
            return Err(StoreError::OracleIsNotContract {
                key,
                oracle: entry.oracle,
            });
        }
        if entry.payment > LINK_TOTAL_SUPPLY {
            return Err(StoreError::PaymentAboveTotalSupply {
                key,
                payment: entry.payment,
            });
        }
        if !self.contracts.contains(&entry.callback_addr) {
            return Err(StoreError::CallbackAddrIsNotContract {
                key,
                callback_addr: entry.callback_addr,
            });
        }
        if entry.callback_function_signature.is_zero() {
            return Err(StoreError::CallbackSignatureIsZero { key });
        }
        if entry.interval.is_zero() {
            return Err(StoreError::IntervalIsZero { key });
        }
        Ok(())
    }

    fn upsert(&self, lot: LotId, keys: &[EntryKey], entries: &[Entry], call: MutationCall) -> StoreResult<MutationReceipt> {
        check_non_empty("keys", keys)?;
        check_same_len("keys", keys.len(), "entries", entries.len())?;
        for (key, entry) in keys.iter().zip(entries) {
            self.check_entry(*key, entry)?;
        }

        let mut state = self.state.lock();
        let lot_state = state.lots.entry(lot).or_default();
        for (key, entry) in keys.iter().zip(entries) {
            let mut entry = entry.clone();
            entry.key = *key;
            lot_state.entries.insert(entry, None);
        }
        Ok(record(&mut state, self.address, call, lot, keys))
    }

    fn remove(&self, lot: LotId, keys: &[EntryKey], call: MutationCall) -> StoreResult<MutationReceipt> {
        check_non_empty("keys", keys)?;

        let mut state = self.state.lock();
        let lot_state = state
            .lots
            .get_mut(&lot)
            .ok_or(StoreError::LotNotInserted(lot))?;
        if let Some(key) = keys.iter().find(|key| !lot_state.entries.contains_key(key)) {
            return Err(StoreError::EntryNotInserted { lot, key: *key });
        }

        for key in keys {
            lot_state.entries.remove(key);
            lot_state.last_request_timestamps.remove(key);
        }
        if lot_state.entries.is_empty() {
            state.lots.remove(&lot);
            debug!(%lot, "last entry removed, lot purged");
        }
        Ok(record(&mut state, self.address, call, lot, keys))
    }
}

fn check_non_empty(name: &'static str, keys: &[EntryKey]) -> StoreResult<()> {
    if keys.is_empty() {
        return Err(StoreError::EmptyArray(name));
    }
    Ok(())
}

fn check_same_len(left: &'static str, left_len: usize, right: &'static str, right_len: usize) -> StoreResult<()> {
    if left_len != right_len {
        return Err(StoreError::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        });
    }
    Ok(())
}

/// Appends a journal record and hands out a receipt whose hash is unique per
/// store and mutation.
fn record(state: &mut State, address: Address, call: MutationCall, lot: LotId, keys: &[EntryKey]) -> MutationReceipt {
    let nonce = state.journal.len() as u64;
    let mut preimage = address.to_vec();
    preimage.extend_from_slice(&nonce.to_be_bytes());
    let tx_hash = keccak256(preimage);

    trace!(?call, %lot, keys = keys.len(), %tx_hash, "mutation accepted");
    state.journal.push(MutationRecord {
        call,
        lot,
        keys: keys.to_vec(),
        tx_hash,
    });
    MutationReceipt { tx_hash }
}

fn inserted_lot<'a>(state: &'a State, lot: &LotId) -> StoreResult<&'a LotState> {
    state.lots.get(lot).ok_or(StoreError::LotNotInserted(*lot))
}

#[async_trait]
impl EntryStore for MemEntryStore {
    async fn lots(&self) -> StoreResult<Vec<LotId>> {
        Ok(self.state.lock().lots.keys().copied().collect())
    }

    async fn lot_is_inserted(&self, lot: LotId) -> StoreResult<bool> {
        Ok(self.state.lock().lots.contains_key(&lot))
    }

    async fn entry_map_keys(&self, lot: LotId) -> StoreResult<Vec<EntryKey>> {
        let state = self.state.lock();
        Ok(inserted_lot(&state, &lot)?.entries.keys().copied().collect())
    }

    async fn entry_is_inserted(&self, lot: LotId, key: EntryKey) -> StoreResult<bool> {
        let state = self.state.lock();
        Ok(state
            .lots
            .get(&lot)
            .is_some_and(|lot_state| lot_state.entries.contains_key(&key)))
    }

    async fn get_entry(&self, lot: LotId, key: EntryKey) -> StoreResult<Entry> {
        let state = self.state.lock();
        inserted_lot(&state, &lot)?
            .entries
            .get(&key)
            .cloned()
            .ok_or(StoreError::EntryNotInserted { lot, key })
    }

    async fn set_entry(&self, lot: LotId, key: EntryKey, entry: &Entry) -> StoreResult<MutationReceipt> {
        self.upsert(lot, &[key], slice::from_ref(entry), MutationCall::SetEntry)
    }

    async fn set_entries(
        &self,
        lot: LotId,
        keys: &[EntryKey],
        entries: &[Entry],
    ) -> StoreResult<MutationReceipt> {
        self.upsert(lot, keys, entries, MutationCall::SetEntries)
    }

    async fn remove_entry(&self, lot: LotId, key: EntryKey) -> StoreResult<MutationReceipt> {
        self.remove(lot, &[key], MutationCall::RemoveEntry)
    }

    async fn remove_entries(&self, lot: LotId, keys: &[EntryKey]) -> StoreResult<MutationReceipt> {
        self.remove(lot, keys, MutationCall::RemoveEntries)
    }

    async fn remove_lot(&self, lot: LotId) -> StoreResult<MutationReceipt> {
        let mut state = self.state.lock();
        let removed = state.lots.remove(&lot).ok_or(StoreError::LotNotInserted(lot))?;
        let keys: Vec<_> = removed.entries.keys().copied().collect();
        debug!(%lot, entries = keys.len(), "lot removed");
        Ok(record(&mut state, self.address, MutationCall::RemoveLot, lot, &keys))
    }

    async fn is_upkeep_allowed(&self, lot: LotId) -> StoreResult<bool> {
        let state = self.state.lock();
        Ok(inserted_lot(&state, &lot)?.is_upkeep_allowed)
    }

    async fn set_is_upkeep_allowed(&self, lot: LotId, allowed: bool) -> StoreResult<MutationReceipt> {
        let mut state = self.state.lock();
        state
            .lots
            .get_mut(&lot)
            .ok_or(StoreError::LotNotInserted(lot))?
            .is_upkeep_allowed = allowed;
        Ok(record(&mut state, self.address, MutationCall::SetIsUpkeepAllowed, lot, &[]))
    }

    async fn last_request_timestamp(&self, lot: LotId, key: EntryKey) -> StoreResult<U256> {
        let state = self.state.lock();
        let lot_state = inserted_lot(&state, &lot)?;
        if !lot_state.entries.contains_key(&key) {
            return Err(StoreError::EntryNotInserted { lot, key });
        }
        Ok(lot_state
            .last_request_timestamps
            .get(&key)
            .copied()
            .unwrap_or_default())
    }

    async fn set_last_request_timestamps(
        &self,
        lot: LotId,
        keys: &[EntryKey],
        timestamps: &[U256],
    ) -> StoreResult<MutationReceipt> {
        check_non_empty("keys", keys)?;
        check_same_len("keys", keys.len(), "timestamps", timestamps.len())?;

        let mut state = self.state.lock();
        let lot_state = state
            .lots
            .get_mut(&lot)
            .ok_or(StoreError::LotNotInserted(lot))?;
        if let Some(key) = keys.iter().find(|key| !lot_state.entries.contains_key(key)) {
            return Err(StoreError::EntryNotInserted { lot, key: *key });
        }
        lot_state
            .last_request_timestamps
            .extend(keys.iter().copied().zip(timestamps.iter().copied()));
        Ok(record(
            &mut state,
            self.address,
            MutationCall::SetLastRequestTimestamps,
            lot,
            keys,
        ))
    }

    async fn latest_round_id(&self) -> StoreResult<U256> {
        Ok(self.state.lock().latest_round_id)
    }
}
