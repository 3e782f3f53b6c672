use alloy_primitives::{keccak256, Address};

use crate::ids::{EntryKey, SpecId};

/// Derives the key of an entry.
///
/// The key is `keccak256(specId ‖ oracle ‖ buffer)` over the tightly packed
/// bytes. Payment, callback and schedule are not part of the identity, so two
/// definitions that only differ there are the same entry.
pub fn derive_entry_key(spec_id: &SpecId, oracle: &Address, buffer: &[u8]) -> EntryKey {
    let mut packed = Vec::with_capacity(spec_id.len() + oracle.len() + buffer.len());
    packed.extend_from_slice(spec_id.as_slice());
    packed.extend_from_slice(oracle.as_slice());
    packed.extend_from_slice(buffer);
    keccak256(packed)
}
