//! Serde adapters for the JSON representations used by entry files and store
//! snapshots.

use alloy_primitives::U256;

/// `U256` as a decimal string. Deserialization also accepts `0x` prefixed hex.
pub mod u256_dec {
    use std::str::FromStr;

    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        U256::from_str(raw.trim()).map_err(|e| D::Error::custom(format!("'{raw}': {e}")))
    }
}

/// Parses a non-negative decimal integer into a `U256`, rejecting signs, hex
/// and surrounding whitespace.
pub fn parse_decimal_u256(raw: &str) -> Option<U256> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(raw, 10).ok()
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "u256_dec")]
        value: U256,
    }

    #[test]
    fn test_u256_serializes_as_decimal() {
        let json = serde_json::to_string(&Wrapper { value: U256::from(3600u64) }).unwrap();
        assert_eq!(json, r#"{"value":"3600"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, U256::from(3600u64));
    }

    #[test]
    fn test_parse_decimal_u256() {
        assert_eq!(parse_decimal_u256("0"), Some(U256::ZERO));
        assert_eq!(parse_decimal_u256("100000000000000000"), Some(U256::from(10u64.pow(17))));
        assert_eq!(parse_decimal_u256("-1"), None);
        assert_eq!(parse_decimal_u256("0x10"), None);
        assert_eq!(parse_decimal_u256(" 1"), None);
        assert_eq!(parse_decimal_u256(""), None);
    }
}
