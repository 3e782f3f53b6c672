//! Applies reconciled entry sets to a remote store.
//!
//! Writes go out one call at a time. A failing call stops the operation and
//! leaves earlier calls applied; running the sync again diffs against the
//! partially updated lot and sends only what is still missing.

mod errors;
mod executor;
mod lot;

pub use errors::{MutationError, SyncError};
pub use executor::{
    apply_mutations, chunk_ranges, BatchMode, BatchReport, ChunkReceipt, MutationKind, MutationSet,
};
pub use lot::{fetch_lot_entries, plan_lot, remove_entry, remove_lot, sync_lot, LotPlan, SyncReport};
