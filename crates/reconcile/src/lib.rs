//! Diffs a locally declared entry set against a remote lot snapshot.

mod diff;

pub use diff::{reconcile, EntryDiff};
