use std::ops::Range;

use lotsync_primitives::{EntryKey, LotId};
use lotsync_store::StoreError;
use thiserror::Error;

use crate::executor::MutationKind;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("{kind} mutation has {keys} keys but {entries} entries")]
    PayloadMismatch {
        kind: MutationKind,
        keys: usize,
        entries: usize,
    },

    #[error(
        "{kind} in lot {lot} failed at batch ({}, {}) after {applied} applied batches, keys {keys:?}: {source}",
        .range.start,
        .range.end.saturating_sub(1)
    )]
    ChunkFailed {
        kind: MutationKind,
        lot: LotId,
        /// Positions of the failed keys in the mutation's key list.
        range: Range<usize>,
        keys: Vec<EntryKey>,
        /// Calls that went through before the failure.
        applied: usize,
        #[source]
        source: StoreError,
    },
}

impl MutationError {
    pub fn lot(&self) -> Option<LotId> {
        match self {
            Self::PayloadMismatch { .. } => None,
            Self::ChunkFailed { lot, .. } => Some(*lot),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("lot {0} is not inserted")]
    LotNotInserted(LotId),

    #[error("entry {key} is not inserted in lot {lot}")]
    EntryNotInserted { lot: LotId, key: EntryKey },

    #[error("failed to read lot {lot}: {source}")]
    Fetch {
        lot: LotId,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error("store call on lot {lot} failed: {source}")]
    Store {
        lot: LotId,
        #[source]
        source: StoreError,
    },
}

impl SyncError {
    /// Maps a store error, keeping the not-inserted conditions explicit.
    pub(crate) fn from_store(lot: LotId, source: StoreError) -> Self {
        match source {
            StoreError::LotNotInserted(lot) => Self::LotNotInserted(lot),
            StoreError::EntryNotInserted { lot, key } => Self::EntryNotInserted { lot, key },
            source => Self::Store { lot, source },
        }
    }
}
