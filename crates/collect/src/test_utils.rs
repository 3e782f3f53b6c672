use alloy_primitives::{address, Address, B256};
use alloy_sol_types::SolEvent;
use lotsync_primitives::Selector;

use crate::event::{ChainlinkFulfilled, RawLog};

pub(crate) const CONSUMER: Address = address!("878e6beb3b15d7a1b7a1a0e9d11b1e5f88d3aeda");
pub(crate) const CALLBACK: Address = address!("5aa7bb55e3b7c7a1ce1db9e8c0e6e3e8a7c9a0b1");

/// A successful fulfillment log whose calldata is `selector ++ args`.
pub(crate) fn fulfillment_log(
    block_number: u64,
    log_index: u64,
    request_id: B256,
    selector: Selector,
    args: &[u8],
) -> RawLog {
    let mut data = selector.to_vec();
    data.extend_from_slice(args);
    let event = ChainlinkFulfilled {
        requestId: request_id,
        success: true,
        isForwarded: false,
        callbackAddr: CALLBACK,
        callbackFunctionSignature: selector,
        data: data.into(),
    };
    let log_data = event.encode_log_data();

    RawLog {
        address: CONSUMER,
        topics: log_data.topics().to_vec(),
        data: log_data.data,
        block_number,
        block_hash: B256::with_last_byte(block_number as u8),
        transaction_hash: B256::with_last_byte(log_index as u8),
        log_index,
    }
}
