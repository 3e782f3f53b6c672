//! Protocol level constants.

use alloy_primitives::U256;

/// Total supply of the LINK token in juels (10^27). A payment can never exceed it.
pub const LINK_TOTAL_SUPPLY: U256 = U256::from_limbs([0x9fd0803ce8000000, 0x33b2e3c, 0, 0]);

/// Length of a Chainlink spec id in bytes.
pub const SPEC_ID_LEN: usize = 32;
