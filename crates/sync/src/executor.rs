//! Chunked, strictly sequential application of a mutation to a lot.

use std::{fmt, num::NonZeroUsize, ops::Range};

use lotsync_primitives::{Entry, EntryKey, EntryMap, LotId};
use lotsync_store::{EntryStore, MutationReceipt, StoreError};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::MutationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Add,
    Update,
    Remove,
}

impl MutationKind {
    fn past_tense(&self) -> &'static str {
        match self {
            Self::Add => "Added",
            Self::Update => "Updated",
            Self::Remove => "Removed",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
        })
    }
}

/// How keys are grouped into store calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchMode {
    /// Batch calls (`set_entries` / `remove_entries`) of at most `chunk_size`
    /// keys, or every key in one call when unset.
    Batched { chunk_size: Option<NonZeroUsize> },
    /// One call per key (`set_entry` / `remove_entry`).
    Single,
}

impl Default for BatchMode {
    fn default() -> Self {
        Self::Batched { chunk_size: None }
    }
}

/// Keys to write to a lot and, for additions and updates, the entries to
/// write under them.
#[derive(Clone, Copy, Debug)]
pub struct MutationSet<'a> {
    pub kind: MutationKind,
    pub keys: &'a [EntryKey],
    pub entries: &'a [Entry],
    /// Where the keys were declared, used to annotate logs.
    pub sources: Option<&'a EntryMap>,
}

impl<'a> MutationSet<'a> {
    pub fn upsert(kind: MutationKind, keys: &'a [EntryKey], entries: &'a [Entry]) -> Self {
        Self {
            kind,
            keys,
            entries,
            sources: None,
        }
    }

    pub fn remove(keys: &'a [EntryKey]) -> Self {
        Self {
            kind: MutationKind::Remove,
            keys,
            entries: &[],
            sources: None,
        }
    }

    pub fn with_sources(mut self, sources: &'a EntryMap) -> Self {
        self.sources = Some(sources);
        self
    }

    fn source_indices(&self, range: &Range<usize>) -> Vec<Option<usize>> {
        let Some(sources) = self.sources else {
            return Vec::new();
        };
        self.keys[range.clone()]
            .iter()
            .map(|key| sources.source_index(key))
            .collect()
    }
}

/// A store call that went through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkReceipt {
    pub range: Range<usize>,
    pub receipt: MutationReceipt,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub kind: MutationKind,
    pub lot: LotId,
    pub chunks: Vec<ChunkReceipt>,
}

/// Splits `0..len` into contiguous ranges of at most `chunk_size`.
pub fn chunk_ranges(len: usize, chunk_size: Option<NonZeroUsize>) -> Vec<Range<usize>> {
    let step = chunk_size.map_or(len, NonZeroUsize::get).max(1);
    (0..len)
        .step_by(step)
        .map(|start| start..(start + step).min(len))
        .collect()
}

/// Applies `set` to `lot`, one call per chunk, each awaited before the next.
///
/// The first failing call aborts: earlier calls stay applied and later ones
/// are never sent.
pub async fn apply_mutations(
    store: &impl EntryStore,
    lot: LotId,
    set: MutationSet<'_>,
    mode: BatchMode,
) -> Result<BatchReport, MutationError> {
    let upsert = set.kind != MutationKind::Remove;
    if upsert && set.entries.len() != set.keys.len() {
        return Err(MutationError::PayloadMismatch {
            kind: set.kind,
            keys: set.keys.len(),
            entries: set.entries.len(),
        });
    }

    let ranges = match mode {
        BatchMode::Batched { chunk_size } => chunk_ranges(set.keys.len(), chunk_size),
        BatchMode::Single => chunk_ranges(set.keys.len(), Some(NonZeroUsize::MIN)),
    };
    debug!(kind = %set.kind, %lot, keys = set.keys.len(), calls = ranges.len(), "applying mutations");

    let mut chunks = Vec::with_capacity(ranges.len());
    for range in ranges {
        let keys = &set.keys[range.clone()];
        let result = match (mode, upsert) {
            (BatchMode::Single, true) => {
                store
                    .set_entry(lot, keys[0], &set.entries[range.start])
                    .await
            }
            (BatchMode::Single, false) => store.remove_entry(lot, keys[0]).await,
            (BatchMode::Batched { .. }, true) => {
                store
                    .set_entries(lot, keys, &set.entries[range.clone()])
                    .await
            }
            (BatchMode::Batched { .. }, false) => store.remove_entries(lot, keys).await,
        };

        let receipt = result.map_err(|source: StoreError| MutationError::ChunkFailed {
            kind: set.kind,
            lot,
            range: range.clone(),
            keys: keys.to_vec(),
            applied: chunks.len(),
            source,
        })?;

        info!(
            %lot,
            tx_hash = %receipt.tx_hash,
            indices = ?set.source_indices(&range),
            "{} in batch ({}, {})",
            set.kind.past_tense(),
            range.start,
            range.end - 1
        );
        chunks.push(ChunkReceipt { range, receipt });
    }

    Ok(BatchReport {
        kind: set.kind,
        lot,
        chunks,
    })
}
