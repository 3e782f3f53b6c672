//! Identifier types and the helpers that derive them.

use alloy_primitives::{keccak256, FixedBytes, B256, U256};
use uuid::Uuid;

/// Key of an entry inside a lot, see [`crate::derive_entry_key`].
pub type EntryKey = B256;

/// Chainlink job spec id, the external job id packed into 32 bytes.
pub type SpecId = B256;

/// Identifier of a lot, a named group of entries stored together.
pub type LotId = U256;

/// 4-byte function selector.
pub type Selector = FixedBytes<4>;

/// Converts an external job id into its spec id.
///
/// The spec id is the ASCII text of the UUID without dashes, which is exactly
/// 32 bytes long.
pub fn spec_id_from_job_id(job_id: &Uuid) -> SpecId {
    let mut buf = [0u8; 32];
    B256::from_slice(job_id.simple().encode_lower(&mut buf).as_bytes())
}

/// Computes the selector of a canonical function signature such as
/// `fulfillUint256(bytes32,uint256)`.
pub fn selector_from_signature(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::from_slice(&hash[..4])
}
