use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named request parameter as written in an entries file.
///
/// `kind` stays a raw string so that an unknown type is reported by the
/// encoder with the parameter's position instead of failing the whole file
/// parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_types: Option<Vec<String>>,
}

impl RequestParameter {
    pub fn new(name: impl Into<String>, kind: ParamKind, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: kind.as_str().to_owned(),
            value,
            value_types: None,
        }
    }

    pub fn with_value_types<I, S>(mut self, value_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_types = Some(value_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn param_kind(&self) -> Option<ParamKind> {
        self.kind.parse().ok()
    }
}

/// Supported parameter types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Hex encoded CBOR fragment appended as is.
    Buffer,
    /// Hex encoded bytes stored as a CBOR byte string.
    BytesRaw,
    Int,
    String,
    StringArray,
    Uint,
    Bool,
    /// `abi.encode(address)` stored as a CBOR byte string.
    Address,
    /// `abi.encode(address[])` stored as a CBOR byte string.
    AddressArray,
    /// `abi.encode(..)` of the values typed by `valueTypes`.
    Bytes,
    /// `abi.encodePacked(..)` of the values typed by `valueTypes`.
    BytesPacked,
    IntArray,
    UintArray,
}

impl ParamKind {
    pub const ALL: [ParamKind; 13] = [
        Self::Buffer,
        Self::BytesRaw,
        Self::Int,
        Self::String,
        Self::StringArray,
        Self::Uint,
        Self::Bool,
        Self::Address,
        Self::AddressArray,
        Self::Bytes,
        Self::BytesPacked,
        Self::IntArray,
        Self::UintArray,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::BytesRaw => "bytes_raw",
            Self::Int => "int",
            Self::String => "string",
            Self::StringArray => "string_array",
            Self::Uint => "uint",
            Self::Bool => "bool",
            Self::Address => "address",
            Self::AddressArray => "address_array",
            Self::Bytes => "bytes",
            Self::BytesPacked => "bytes_packed",
            Self::IntArray => "int_array",
            Self::UintArray => "uint_array",
        }
    }

    /// Whether the kind takes `valueTypes`.
    pub const fn takes_value_types(&self) -> bool {
        matches!(self, Self::Bytes | Self::BytesPacked)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ParamKind::ALL {
            assert_eq!(kind.as_str().parse::<ParamKind>(), Ok(kind));
        }
        assert!("uint256".parse::<ParamKind>().is_err());
    }

    #[test]
    fn test_parameter_json_shape() {
        let param: RequestParameter = serde_json::from_value(json!({
            "name": "data",
            "type": "bytes",
            "value": ["0x0000000000000000000000000000000000000001", 7],
            "valueTypes": ["address", "uint256"],
        }))
        .unwrap();
        assert_eq!(param.param_kind(), Some(ParamKind::Bytes));
        assert_eq!(param.value_types.as_deref().map(<[String]>::len), Some(2));

        let unknown = serde_json::from_value::<RequestParameter>(json!({
            "name": "x", "type": "string", "value": "y", "extra": 1
        }));
        assert!(unknown.is_err());
    }
}
