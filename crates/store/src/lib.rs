//! The remote entry store: the consumer contract surface the sync flows talk
//! to, and an in-memory implementation of its rules.

mod errors;
mod mem;
mod snapshot;
mod traits;

pub use errors::{StoreError, StoreResult};
pub use mem::{MemEntryStore, MutationCall, MutationRecord};
pub use snapshot::{LotSnapshot, StoreSnapshot, TimestampSnapshot};
#[cfg(any(test, feature = "test-utils"))]
pub use traits::MockEntryStore;
pub use traits::{EntryStore, MutationReceipt};
