//! Fixtures shared by the test suites of downstream crates.

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    entry::{Entry, RequestType},
    ids::{selector_from_signature, SpecId},
    key::derive_entry_key,
};

/// Builds a keyed entry whose identity depends on `tag` and whose payment is
/// `payment`.
pub fn sample_entry(tag: u8, payment: u64) -> Entry {
    let spec_id = SpecId::repeat_byte(tag);
    let oracle = Address::repeat_byte(0xaa);
    let buffer = Bytes::from(vec![0x63, b'g', b'e', b't', tag]);
    Entry {
        key: derive_entry_key(&spec_id, &oracle, &buffer),
        spec_id,
        oracle,
        payment: U256::from(payment),
        callback_addr: Address::repeat_byte(0xbb),
        callback_function_signature: selector_from_signature("fulfillUint256(bytes32,uint256)"),
        request_type: RequestType::Oracle,
        buffer,
        start_at: U256::ZERO,
        interval: U256::from(3600u64),
        inactive: false,
    }
}
