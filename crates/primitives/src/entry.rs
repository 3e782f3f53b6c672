//! The entry as stored by the consumer contract.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    errors::PrimitivesError,
    ids::{EntryKey, Selector, SpecId},
    key::derive_entry_key,
    serde_helpers::u256_dec,
};

/// How the oracle request is built on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RequestType {
    /// Request sent to an `Oracle.sol` contract.
    Oracle = 0,
    /// Request sent to an `Operator.sol` contract.
    Operator = 1,
}

impl TryFrom<u8> for RequestType {
    type Error = PrimitivesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Oracle),
            1 => Ok(Self::Operator),
            other => Err(PrimitivesError::InvalidRequestType(other)),
        }
    }
}

impl From<RequestType> for u8 {
    fn from(value: RequestType) -> Self {
        value as u8
    }
}

/// A scheduled data request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub key: EntryKey,
    pub spec_id: SpecId,
    pub oracle: Address,
    #[serde(with = "u256_dec")]
    pub payment: U256,
    pub callback_addr: Address,
    pub callback_function_signature: Selector,
    pub request_type: RequestType,
    pub buffer: Bytes,
    #[serde(with = "u256_dec")]
    pub start_at: U256,
    #[serde(with = "u256_dec")]
    pub interval: U256,
    pub inactive: bool,
}

impl Entry {
    /// Recomputes the key from the identity fields.
    pub fn derived_key(&self) -> EntryKey {
        derive_entry_key(&self.spec_id, &self.oracle, &self.buffer)
    }

    /// Whether any field that can change without changing the key differs.
    ///
    /// Key, spec id, oracle, request type and buffer are not compared.
    pub fn has_differences(&self, other: &Entry) -> bool {
        self.payment != other.payment
            || self.callback_addr != other.callback_addr
            || self.callback_function_signature != other.callback_function_signature
            || self.start_at != other.start_at
            || self.interval != other.interval
            || self.inactive != other.inactive
    }
}
