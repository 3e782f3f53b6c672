//! ABI sub-encoding of JSON values for the `address*` and `bytes*` kinds.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use serde_json::Value;

use crate::errors::ParamError;

/// ABI encodes `values` typed by `types`, either as `abi.encode(..)` or as
/// `abi.encodePacked(..)`.
pub(crate) fn encode_typed<T: AsRef<str>>(
    values: &[Value],
    types: &[T],
    packed: bool,
) -> Result<Vec<u8>, ParamError> {
    if values.len() != types.len() {
        return Err(ParamError::ArityMismatch {
            values: values.len(),
            types: types.len(),
        });
    }

    let coerced = values
        .iter()
        .zip(types)
        .map(|(value, ty)| {
            let ty = DynSolType::parse(ty.as_ref())?;
            coerce(&ty, value)
        })
        .collect::<Result<Vec<_>, ParamError>>()?;

    let tuple = DynSolValue::Tuple(coerced);
    Ok(if packed {
        tuple.abi_encode_packed()
    } else {
        tuple.abi_encode_params()
    })
}

/// Converts a JSON value into a typed ABI value. Arrays and tuples take JSON
/// arrays, scalars take strings, numbers or booleans.
fn coerce(ty: &DynSolType, value: &Value) -> Result<DynSolValue, ParamError> {
    match (ty, value) {
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce(inner, item))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(ParamError::invalid(ty.sol_type_name(), value));
            }
            items
                .iter()
                .map(|item| coerce(inner, item))
                .collect::<Result<_, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            if items.len() != types.len() {
                return Err(ParamError::invalid(ty.sol_type_name(), value));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| coerce(ty, item))
                .collect::<Result<_, _>>()
                .map(DynSolValue::Tuple)
        }
        (DynSolType::String, Value::String(s)) => Ok(DynSolValue::String(s.clone())),
        (DynSolType::Bool, Value::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (
            DynSolType::Array(_) | DynSolType::FixedArray(..) | DynSolType::Tuple(_),
            _,
        ) => Err(ParamError::invalid(ty.sol_type_name(), value)),
        (_, Value::String(s)) => Ok(ty.coerce_str(s)?),
        (_, Value::Number(n)) => Ok(ty.coerce_str(&n.to_string())?),
        (_, Value::Bool(b)) => Ok(ty.coerce_str(if *b { "true" } else { "false" })?),
        _ => Err(ParamError::invalid(ty.sol_type_name(), value)),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{hex, Address, U256};
    use serde_json::json;

    use super::*;

    const ORACLE: &str = "0x878E6bEB3B15D7A1b7A1a0e9d11b1E5f88D3AeDa";

    #[test]
    fn test_standard_encoding_pads_every_word() {
        let out = encode_typed(&[json!(ORACLE), json!(7)], &["address", "uint256"], false).unwrap();
        assert_eq!(out.len(), 64);
        let oracle: Address = ORACLE.parse().unwrap();
        assert_eq!(&out[12..32], oracle.as_slice());
        assert_eq!(&out[32..], U256::from(7u8).to_be_bytes::<32>());
    }

    #[test]
    fn test_packed_encoding_is_tight() {
        let out = encode_typed(&[json!(ORACLE), json!("1")], &["address", "uint8"], true).unwrap();
        assert_eq!(out.len(), 21);
        assert_eq!(out[20], 1);
    }

    #[test]
    fn test_dynamic_array_encoding() {
        let out = encode_typed(
            &[json!([ORACLE, "0x0000000000000000000000000000000000000001"])],
            &["address[]"],
            false,
        )
        .unwrap();
        // offset, length, two words
        assert_eq!(out.len(), 4 * 32);
        assert_eq!(&out[..32], U256::from(32u8).to_be_bytes::<32>());
        assert_eq!(&out[32..64], U256::from(2u8).to_be_bytes::<32>());
    }

    #[test]
    fn test_string_and_bool_values() {
        let out = encode_typed(&[json!("hi"), json!(true)], &["string", "bool"], true).unwrap();
        assert_eq!(out, hex!("686901"));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = encode_typed(&[json!(1)], &["uint256", "bool"], false).unwrap_err();
        assert!(matches!(
            err,
            ParamError::ArityMismatch {
                values: 1,
                types: 2
            }
        ));
    }

    #[test]
    fn test_bad_values_are_surfaced() {
        assert!(matches!(
            encode_typed(&[json!("not an address")], &["address"], false),
            Err(ParamError::Abi(_))
        ));
        assert!(matches!(
            encode_typed(&[json!("x")], &["uint256[]"], false),
            Err(ParamError::InvalidValue { .. })
        ));
        assert!(matches!(
            encode_typed(&[json!(1)], &["notatype"], false),
            Err(ParamError::Abi(_))
        ));
    }
}
