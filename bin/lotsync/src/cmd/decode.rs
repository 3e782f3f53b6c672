use std::iter;

use alloy_primitives::Bytes;
use anyhow::{bail, Context};
use argh::FromArgs;
use itertools::Itertools;
use lotsync_decoders::{Decoded, DecoderRegistry};
use lotsync_primitives::Selector;
use serde::Serialize;

/// Decodes fulfillment calldata with the built-in decoders
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "decode")]
pub(crate) struct DecodeArgs {
    #[argh(positional, description = "callback calldata (hex, selector included)")]
    pub(crate) data: Bytes,

    #[argh(option, description = "extra candidate selector, tried in order")]
    pub(crate) selector: Vec<Selector>,

    #[argh(option, description = "extra candidate callback, by signature or bare name")]
    pub(crate) name: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RejectedCandidate {
    pub(crate) selector: Selector,
    pub(crate) signature: &'static str,
    pub(crate) reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DecodeOutput {
    pub(crate) decoded: Decoded,
    pub(crate) rejected: Vec<RejectedCandidate>,
}

pub(crate) fn decode(args: DecodeArgs) -> anyhow::Result<DecodeOutput> {
    let Some((selector, payload)) = args.data.split_first_chunk::<4>() else {
        bail!("calldata is shorter than a selector: {}", args.data);
    };
    let registry = DecoderRegistry::builtin().context("building decoder registry")?;

    let mut extra = Vec::new();
    for name in &args.name {
        let resolved = registry.resolve_name(name);
        if resolved.is_empty() {
            bail!("no decoder named {name}");
        }
        extra.extend(resolved);
    }
    extra.extend(args.selector.iter().copied());

    let candidates: Vec<Selector> = iter::once(Selector::from(*selector))
        .chain(extra)
        .unique()
        .collect();

    let outcome = registry.decode_first(&candidates, payload);
    let rejected = outcome
        .failures
        .into_iter()
        .map(|failure| RejectedCandidate {
            selector: failure.selector,
            signature: failure.signature,
            reason: failure.reason.to_string(),
        })
        .collect::<Vec<_>>();

    match outcome.decoded {
        Some(decoded) => Ok(DecodeOutput { decoded, rejected }),
        None if rejected.is_empty() => bail!("no decoder for candidates {candidates:?}"),
        None => bail!(
            "every candidate rejected the payload: {}",
            rejected
                .iter()
                .map(|r| format!("{}: {}", r.signature, r.reason))
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{hex, B256, U256};
    use lotsync_decoders::DecodedValue;

    use super::*;

    fn uint_calldata(selector: [u8; 4], value: u64) -> Bytes {
        let mut data = selector.to_vec();
        data.extend_from_slice(B256::repeat_byte(0x01).as_slice());
        data.extend_from_slice(&U256::from(value).to_be_bytes::<32>());
        data.into()
    }

    fn args(data: Bytes) -> DecodeArgs {
        DecodeArgs {
            data,
            selector: Vec::new(),
            name: Vec::new(),
        }
    }

    #[test]
    fn test_decodes_by_own_selector() {
        let output = decode(args(uint_calldata(hex!("7c1f72a0"), 777))).unwrap();
        assert_eq!(output.decoded.signature, "fulfillUint256(bytes32,uint256)");
        assert_eq!(output.decoded.value, DecodedValue::Number(777));
        assert!(output.rejected.is_empty());
    }

    #[test]
    fn test_falls_back_to_named_candidate() {
        let mut args = args(uint_calldata(hex!("deadbeef"), 5));
        args.name = vec!["fulfillUint256".to_owned()];

        let output = decode(args).unwrap();
        assert_eq!(output.decoded.selector, Selector::from(hex!("7c1f72a0")));
    }

    #[test]
    fn test_unknown_selector_fails() {
        let err = decode(args(uint_calldata(hex!("deadbeef"), 5))).unwrap_err();
        assert!(err.to_string().contains("no decoder"));
    }

    #[test]
    fn test_short_calldata_fails() {
        assert!(decode(args(Bytes::from_static(&[0x7c, 0x1f]))).is_err());
    }

    #[test]
    fn test_rejections_are_reported() {
        let mut data = hex!("7c1f72a0").to_vec();
        data.extend_from_slice(&[0xde, 0xad]);
        let err = decode(args(data.into())).unwrap_err();
        assert!(err.to_string().contains("fulfillUint256(bytes32,uint256)"));
    }
}
