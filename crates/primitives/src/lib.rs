//! Core data types shared by every lotsync crate: entry identities, the
//! stored entry layout and the ordered entry map used for reconciliation.

pub mod constants;
pub mod entry;
pub mod entry_map;
pub mod errors;
pub mod ids;
pub mod key;
pub mod serde_helpers;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use entry::{Entry, RequestType};
pub use entry_map::{EntryMap, IndexedEntry};
pub use errors::PrimitivesError;
pub use ids::{selector_from_signature, spec_id_from_job_id, EntryKey, LotId, Selector, SpecId};
pub use key::derive_entry_key;
