//! The fulfillment event emitted by the consumer and its raw log form.

use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::{sol, SolEvent};
use lotsync_primitives::Selector;
use serde::{Deserialize, Serialize};

use crate::errors::CollectError;

sol! {
    /// Emitted by the consumer once an oracle fulfills one of its requests.
    /// `data` is the full callback calldata, selector included.
    #[derive(Debug, PartialEq, Eq)]
    event ChainlinkFulfilled(
        bytes32 indexed requestId,
        bool success,
        bool isForwarded,
        address indexed callbackAddr,
        bytes4 indexed callbackFunctionSignature,
        bytes data
    );
}

/// A log as returned by a node, along with its position in the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: u64,
    pub block_hash: B256,
    pub transaction_hash: B256,
    pub log_index: u64,
}

/// A decoded `ChainlinkFulfilled` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentEvent {
    pub block_number: u64,
    pub block_hash: B256,
    pub transaction_hash: B256,
    pub log_index: u64,
    pub request_id: B256,
    pub success: bool,
    pub is_forwarded: bool,
    pub callback_addr: Address,
    pub callback_function_signature: Selector,
    pub data: Bytes,
}

impl FulfillmentEvent {
    pub fn from_log(log: &RawLog) -> Result<Self, CollectError> {
        if log.topics.first() != Some(&ChainlinkFulfilled::SIGNATURE_HASH) {
            return Err(CollectError::NotAFulfillment {
                tx_hash: log.transaction_hash,
                log_index: log.log_index,
            });
        }
        let event = ChainlinkFulfilled::decode_raw_log(log.topics.iter().copied(), &log.data)
            .map_err(|source| CollectError::MalformedLog {
                tx_hash: log.transaction_hash,
                log_index: log.log_index,
                source,
            })?;

        Ok(Self {
            block_number: log.block_number,
            block_hash: log.block_hash,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
            request_id: event.requestId,
            success: event.success,
            is_forwarded: event.isForwarded,
            callback_addr: event.callbackAddr,
            callback_function_signature: event.callbackFunctionSignature,
            data: event.data,
        })
    }

    /// Callback arguments with the leading selector stripped, `None` when the
    /// data is too short to carry one.
    pub fn payload(&self) -> Option<&[u8]> {
        self.data.get(4..)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::hex;

    use super::*;
    use crate::test_utils::{fulfillment_log, CALLBACK};

    #[test]
    fn test_from_log_reads_every_field() {
        let selector = Selector::from(hex!("7c1f72a0"));
        let log = fulfillment_log(7, 2, B256::repeat_byte(0x11), selector, &[0xaa; 64]);

        let event = FulfillmentEvent::from_log(&log).unwrap();
        assert_eq!(event.block_number, 7);
        assert_eq!(event.log_index, 2);
        assert_eq!(event.request_id, B256::repeat_byte(0x11));
        assert!(event.success);
        assert!(!event.is_forwarded);
        assert_eq!(event.callback_addr, CALLBACK);
        assert_eq!(event.callback_function_signature, selector);
        assert_eq!(&event.data[..4], selector.as_slice());
        assert_eq!(event.payload().unwrap(), &[0xaa; 64][..]);
    }

    #[test]
    fn test_from_log_rejects_foreign_events() {
        let mut log = fulfillment_log(1, 0, B256::ZERO, Selector::ZERO, &[]);
        log.topics[0] = B256::repeat_byte(0xee);
        assert!(matches!(
            FulfillmentEvent::from_log(&log),
            Err(CollectError::NotAFulfillment { log_index: 0, .. })
        ));
    }

    #[test]
    fn test_payload_needs_a_selector() {
        let mut event =
            FulfillmentEvent::from_log(&fulfillment_log(1, 0, B256::ZERO, Selector::ZERO, &[]))
                .unwrap();
        assert_eq!(event.payload(), Some(&[][..]));
        event.data = Bytes::from_static(&[0x01, 0x02]);
        assert_eq!(event.payload(), None);
    }
}
