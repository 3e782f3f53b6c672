//! Insertion ordered map of entries keyed by [`EntryKey`].

use alloy_primitives::map::HashMap;

use crate::{entry::Entry, ids::EntryKey};

/// An entry along with the position of its definition in the source it was
/// loaded from, when there is one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedEntry {
    pub entry: Entry,
    pub source_index: Option<usize>,
}

/// Entries keyed by their key, iterated in first-insertion order.
///
/// Both the local declarative set and remote lot snapshots are held in this
/// shape so that reconciliation can compare them directly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryMap {
    order: Vec<EntryKey>,
    entries: HashMap<EntryKey, IndexedEntry>,
}

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry under its own key.
    ///
    /// A repeated key keeps its original position and the new entry replaces
    /// the old one, which is returned.
    pub fn insert(&mut self, entry: Entry, source_index: Option<usize>) -> Option<IndexedEntry> {
        let key = entry.key;
        let previous = self.entries.insert(
            key,
            IndexedEntry {
                entry,
                source_index,
            },
        );
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &EntryKey) -> Option<IndexedEntry> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    pub fn get(&self, key: &EntryKey) -> Option<&Entry> {
        self.entries.get(key).map(|indexed| &indexed.entry)
    }

    pub fn get_indexed(&self, key: &EntryKey) -> Option<&IndexedEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &EntryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Position of the entry's definition in its source.
    pub fn source_index(&self, key: &EntryKey) -> Option<usize> {
        self.entries.get(key).and_then(|indexed| indexed.source_index)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &EntryKey> + '_ {
        self.order.iter()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|indexed| &indexed.entry))
    }

    /// Looks up the entries of `keys`, skipping unknown ones.
    pub fn entries_for<'a>(&'a self, keys: &'a [EntryKey]) -> impl Iterator<Item = &'a Entry> + 'a {
        keys.iter().filter_map(move |key| self.get(key))
    }
}

impl FromIterator<Entry> for EntryMap {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut map = Self::new();
        for entry in iter {
            map.insert(entry, None);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;
    use crate::test_utils::sample_entry;

    #[test]
    fn test_keeps_insertion_order() {
        let entries = [sample_entry(3, 1), sample_entry(1, 1), sample_entry(2, 1)];
        let map: EntryMap = entries.iter().cloned().collect();

        let keys: Vec<_> = map.keys().copied().collect();
        let expected: Vec<_> = entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, expected);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let mut map = EntryMap::new();
        assert!(map.insert(sample_entry(1, 1), Some(0)).is_none());
        assert!(map.insert(sample_entry(2, 1), Some(1)).is_none());

        let previous = map.insert(sample_entry(1, 9), Some(2)).unwrap();
        assert_eq!(previous.source_index, Some(0));

        let first = map.keys().next().copied().unwrap();
        assert_eq!(first, sample_entry(1, 0).key);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&first).unwrap().payment, U256::from(9u8));
        assert_eq!(map.source_index(&first), Some(2));
    }

    #[test]
    fn test_remove_keeps_order() {
        let entries = [sample_entry(1, 1), sample_entry(2, 1), sample_entry(3, 1)];
        let mut map: EntryMap = entries.iter().cloned().collect();

        assert!(map.remove(&entries[1].key).is_some());
        assert!(map.remove(&entries[1].key).is_none());
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec![entries[0].key, entries[2].key]);
    }

    #[test]
    fn test_entries_for_skips_unknown() {
        let map: EntryMap = [sample_entry(1, 1)].into_iter().collect();
        let keys = [sample_entry(1, 1).key, EntryKey::ZERO];
        assert_eq!(map.entries_for(&keys).count(), 1);
    }
}
