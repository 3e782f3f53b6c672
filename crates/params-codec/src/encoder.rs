use std::slice;

use alloy_primitives::{hex, Bytes, I256, U256};
use minicbor::Encoder;
use serde_json::Value;

use crate::{
    abi::encode_typed,
    cbor::{self, CborEncoder},
    errors::{EncodingError, ParamError},
    param::{ParamKind, RequestParameter},
};

/// Encodes `params` into a Chainlink request buffer.
///
/// Every parameter is appended as a `name, value` pair in order. The result is
/// deterministic for a given input, which the entry key depends on.
pub fn encode_request_params(params: &[RequestParameter]) -> Result<Bytes, EncodingError> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    for (index, param) in params.iter().enumerate() {
        encode_param(&mut enc, param).map_err(|reason| EncodingError {
            index,
            name: param.name.clone(),
            reason,
        })?;
    }
    Ok(Bytes::from(buf))
}

/// Wraps a request buffer into an indefinite-length CBOR map, the form the
/// node decodes it in.
pub fn as_cbor_map(buffer: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buffer.len() + 2);
    out.push(0xbf);
    out.extend_from_slice(buffer);
    out.push(0xff);
    out
}

fn encode_param(enc: &mut CborEncoder<'_>, param: &RequestParameter) -> Result<(), ParamError> {
    if param.name.is_empty() {
        return Err(ParamError::EmptyName);
    }
    let kind = param
        .param_kind()
        .ok_or_else(|| ParamError::UnsupportedType(param.kind.clone()))?;
    let value = &param.value;

    let value_types = match (&param.value_types, kind.takes_value_types()) {
        (Some(_), false) => return Err(ParamError::UnexpectedValueTypes),
        (None, true) => {
            return Err(ParamError::ArityMismatch {
                values: value.as_array().map_or(1, Vec::len),
                types: 0,
            })
        }
        (types, _) => types.as_deref().unwrap_or_default(),
    };

    if kind != ParamKind::Buffer {
        enc.str(&param.name)?;
    }

    match kind {
        ParamKind::Buffer => cbor::write_fragment(enc, &parse_hex(value)?),
        ParamKind::BytesRaw => {
            enc.bytes(&parse_hex(value)?)?;
        }
        ParamKind::String => {
            enc.str(expect_str(value)?)?;
        }
        ParamKind::Bool => {
            let flag = value
                .as_bool()
                .ok_or_else(|| ParamError::invalid("bool", value))?;
            enc.bool(flag)?;
        }
        ParamKind::Int => cbor::write_int(enc, parse_int(value)?)?,
        ParamKind::Uint => cbor::write_uint(enc, parse_uint(value)?)?,
        ParamKind::StringArray => {
            enc.begin_array()?;
            for item in expect_array(value, "string[]")? {
                enc.str(expect_str(item)?)?;
            }
            enc.end()?;
        }
        ParamKind::IntArray => {
            enc.begin_array()?;
            for item in expect_array(value, "int[]")? {
                cbor::write_int(enc, parse_int(item)?)?;
            }
            enc.end()?;
        }
        ParamKind::UintArray => {
            enc.begin_array()?;
            for item in expect_array(value, "uint[]")? {
                cbor::write_uint(enc, parse_uint(item)?)?;
            }
            enc.end()?;
        }
        ParamKind::Address => {
            enc.bytes(&encode_typed(slice::from_ref(value), &["address"], false)?)?;
        }
        ParamKind::AddressArray => {
            enc.bytes(&encode_typed(slice::from_ref(value), &["address[]"], false)?)?;
        }
        ParamKind::Bytes | ParamKind::BytesPacked => {
            let values = expect_array(value, "array of sub-values")?;
            let packed = kind == ParamKind::BytesPacked;
            enc.bytes(&encode_typed(values, value_types, packed)?)?;
        }
    }
    Ok(())
}

fn expect_str(value: &Value) -> Result<&str, ParamError> {
    value
        .as_str()
        .ok_or_else(|| ParamError::invalid("string", value))
}

fn expect_array<'a>(value: &'a Value, expected: &str) -> Result<&'a [Value], ParamError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ParamError::invalid(expected, value))
}

fn parse_hex(value: &Value) -> Result<Vec<u8>, ParamError> {
    value
        .as_str()
        .and_then(|s| hex::decode(s).ok())
        .ok_or_else(|| ParamError::invalid("hex bytes", value))
}

/// Integers are taken from JSON numbers or from decimal / `0x` strings so that
/// values beyond 2^53 survive the JSON round trip.
fn parse_int(value: &Value) -> Result<I256, ParamError> {
    let parsed = match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ParamError::invalid("int256", value))
}

fn parse_uint(value: &Value) -> Result<U256, ParamError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ParamError::invalid("uint256", value))
}
