use alloy_primitives::{Address, U256};
use lotsync_primitives::{EntryKey, LotId};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by an [`EntryStore`](crate::EntryStore). The variants
/// mirror the custom errors of the consumer contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("lot {0} is not inserted")]
    LotNotInserted(LotId),

    #[error("entry {key} is not inserted in lot {lot}")]
    EntryNotInserted { lot: LotId, key: EntryKey },

    #[error("'{0}' is empty")]
    EmptyArray(&'static str),

    #[error("array lengths differ: {left}={left_len}, {right}={right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("entry {key}: spec id is zero")]
    SpecIdIsZero { key: EntryKey },

    #[error("entry {key}: oracle {oracle} is not a contract")]
    OracleIsNotContract { key: EntryKey, oracle: Address },

    #[error("entry {key}: oracle is the consumer itself")]
    OracleIsConsumer { key: EntryKey },

    #[error("entry {key}: payment {payment} exceeds the LINK total supply")]
    PaymentAboveTotalSupply { key: EntryKey, payment: U256 },

    #[error("entry {key}: callback address {callback_addr} is not a contract")]
    CallbackAddrIsNotContract { key: EntryKey, callback_addr: Address },

    #[error("entry {key}: callback function signature is zero")]
    CallbackSignatureIsZero { key: EntryKey },

    #[error("entry {key}: interval is zero")]
    IntervalIsZero { key: EntryKey },

    #[error("transport: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether the error reports a missing lot or entry, conditions callers
    /// are expected to branch on.
    pub fn is_not_inserted(&self) -> bool {
        matches!(
            self,
            Self::LotNotInserted(_) | Self::EntryNotInserted { .. }
        )
    }
}
