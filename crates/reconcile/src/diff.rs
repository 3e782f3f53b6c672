use lotsync_primitives::{EntryKey, EntryMap};
use serde::Serialize;

/// Keys to change so that the remote lot matches the local entries.
///
/// `to_add`, `to_check` and `to_update` follow local order, `to_remove`
/// follows remote order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EntryDiff {
    /// Local keys missing remotely.
    pub to_add: Vec<EntryKey>,
    /// Remote keys no longer declared locally.
    pub to_remove: Vec<EntryKey>,
    /// Keys present on both sides.
    pub to_check: Vec<EntryKey>,
    /// Subset of `to_check` whose mutable fields differ.
    pub to_update: Vec<EntryKey>,
}

impl EntryDiff {
    /// Whether applying the diff would be a no-op.
    pub fn is_synced(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty() && self.to_update.is_empty()
    }
}

/// Computes the diff between `local` and `remote`.
pub fn reconcile(local: &EntryMap, remote: &EntryMap) -> EntryDiff {
    let mut diff = EntryDiff::default();

    for entry in local.entries() {
        match remote.get(&entry.key) {
            Some(remote_entry) => {
                diff.to_check.push(entry.key);
                if entry.has_differences(remote_entry) {
                    diff.to_update.push(entry.key);
                }
            }
            None => diff.to_add.push(entry.key),
        }
    }

    diff.to_remove = remote
        .keys()
        .filter(|key| !local.contains_key(key))
        .copied()
        .collect();

    diff
}
