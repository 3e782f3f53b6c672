//! Selector keyed registry of fulfillment decoders.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::map::HashMap;
use lotsync_primitives::{selector_from_signature, Selector};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    catalogue::{CatalogueEntry, PostProcess, CATALOGUE},
    errors::{DecodeError, RegistryError},
    value::DecodedValue,
};

/// A catalogue entry with its layout parsed and its selector computed.
#[derive(Clone, Debug)]
pub struct RegisteredDecoder {
    selector: Selector,
    adapter: &'static str,
    signature: &'static str,
    layout: DynSolType,
    post: Option<PostProcess>,
}

impl RegisteredDecoder {
    fn new(entry: &CatalogueEntry) -> Result<Self, RegistryError> {
        let params = entry
            .signature
            .find('(')
            .map(|start| &entry.signature[start..])
            .ok_or(RegistryError::MissingParameters(entry.signature))?;
        let layout_str = entry.layout.unwrap_or(params);
        let layout =
            DynSolType::parse(layout_str).map_err(|source| RegistryError::InvalidLayout {
                signature: entry.signature,
                layout: layout_str,
                source,
            })?;

        match &layout {
            DynSolType::Tuple(types) if types.first() == Some(&DynSolType::FixedBytes(32)) => {}
            _ => {
                return Err(RegistryError::LayoutWithoutRequestId {
                    signature: entry.signature,
                    layout: layout_str,
                })
            }
        }

        Ok(Self {
            selector: selector_from_signature(entry.signature),
            adapter: entry.adapter,
            signature: entry.signature,
            layout,
            post: entry.post,
        })
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn adapter(&self) -> &'static str {
        self.adapter
    }

    pub fn signature(&self) -> &'static str {
        self.signature
    }

    /// Function name without its parameter list.
    pub fn name(&self) -> &'static str {
        self.signature
            .split_once('(')
            .map_or(self.signature, |(name, _)| name)
    }

    /// Decodes an ABI encoded argument list, the selector already stripped,
    /// and reports everything after the request id.
    pub fn decode(&self, payload: &[u8]) -> Result<DecodedValue, DecodeError> {
        let mut values = match self.layout.abi_decode_params(payload)? {
            DynSolValue::Tuple(values) if !values.is_empty() => values,
            other => return Err(DecodeError::shape("a parameter list", other)),
        };
        values.remove(0);

        match (self.post, values.len()) {
            (Some(post), _) => post(values),
            (None, 1) => Ok(DecodedValue::from(values.swap_remove(0))),
            (None, _) => Ok(DecodedValue::List(
                values.into_iter().map(DecodedValue::from).collect(),
            )),
        }
    }
}

/// Successful decode of a payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub selector: Selector,
    pub adapter: &'static str,
    pub signature: &'static str,
    pub value: DecodedValue,
}

/// A candidate decoder that rejected the payload.
#[derive(Debug)]
pub struct DecodeFailure {
    pub selector: Selector,
    pub signature: &'static str,
    pub reason: DecodeError,
}

/// Result of trying a list of candidate selectors against one payload.
#[derive(Debug, Default)]
pub struct FallbackOutcome {
    /// First successful decode, if any.
    pub decoded: Option<Decoded>,

    /// Failures of the candidates tried before it, in order.
    pub failures: Vec<DecodeFailure>,
}

impl FallbackOutcome {
    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }
}

/// Decoders keyed by the selector of their callback signature.
#[derive(Clone, Debug, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<Selector, RegisteredDecoder>,
    order: Vec<Selector>,
}

impl DecoderRegistry {
    /// Builds a registry from a catalogue. On selector collision the later
    /// entry replaces the earlier one.
    pub fn from_catalogue(catalogue: &[CatalogueEntry]) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for entry in catalogue {
            registry.insert(RegisteredDecoder::new(entry)?);
        }
        debug!(decoders = registry.len(), "built decoder registry");
        Ok(registry)
    }

    /// Registry of the built-in [`CATALOGUE`].
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_catalogue(CATALOGUE)
    }

    fn insert(&mut self, decoder: RegisteredDecoder) {
        let selector = decoder.selector;
        match self.decoders.insert(selector, decoder) {
            Some(previous) => {
                warn!(
                    %selector,
                    replaced = previous.signature,
                    "selector collision in decoder catalogue"
                );
            }
            None => self.order.push(selector),
        }
    }

    pub fn has(&self, selector: &Selector) -> bool {
        self.decoders.contains_key(selector)
    }

    pub fn get(&self, selector: &Selector) -> Option<&RegisteredDecoder> {
        self.decoders.get(selector)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Decoders in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredDecoder> + '_ {
        self.order.iter().filter_map(|selector| self.decoders.get(selector))
    }

    /// Selectors a callback name refers to.
    ///
    /// A full signature such as `fulfillUint256(bytes32,uint256)` maps to its
    /// selector whether registered or not. A bare name such as
    /// `fulfillUint256` maps to every registered signature with that name.
    pub fn resolve_name(&self, name: &str) -> Vec<Selector> {
        if name.contains('(') {
            return vec![selector_from_signature(name)];
        }
        self.iter()
            .filter(|decoder| decoder.name() == name)
            .map(RegisteredDecoder::selector)
            .collect()
    }

    /// Tries each candidate in order and returns the first successful decode.
    ///
    /// Candidates without a registered decoder are skipped. Every decoder that
    /// rejects the payload is logged and recorded in
    /// [`FallbackOutcome::failures`].
    pub fn decode_first(&self, candidates: &[Selector], payload: &[u8]) -> FallbackOutcome {
        let mut outcome = FallbackOutcome::default();
        for selector in candidates {
            let Some(decoder) = self.decoders.get(selector) else {
                debug!(%selector, "no decoder registered for candidate");
                continue;
            };

            match decoder.decode(payload) {
                Ok(value) => {
                    outcome.decoded = Some(Decoded {
                        selector: *selector,
                        adapter: decoder.adapter,
                        signature: decoder.signature,
                        value,
                    });
                    return outcome;
                }
                Err(reason) => {
                    warn!(
                        %selector,
                        signature = decoder.signature,
                        %reason,
                        "decoder rejected payload"
                    );
                    outcome.failures.push(DecodeFailure {
                        selector: *selector,
                        signature: decoder.signature,
                        reason,
                    });
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{hex, B256, U256};

    use super::*;

    const FULFILL_UINT256: &str = "fulfillUint256(bytes32,uint256)";
    const FULFILL_STRING: &str = "fulfillString(bytes32,string)";

    fn uint_payload(value: u64) -> Vec<u8> {
        DynSolValue::Tuple(vec![
            DynSolValue::FixedBytes(B256::repeat_byte(0x01), 32),
            DynSolValue::Uint(U256::from(value), 256),
        ])
        .abi_encode_params()
    }

    #[test]
    fn test_builtin_has_no_selector_collisions() {
        let registry = DecoderRegistry::builtin().unwrap();
        assert_eq!(registry.len(), CATALOGUE.len());
    }

    #[test]
    fn test_fulfill_uint256_decodes_777() {
        let registry = DecoderRegistry::builtin().unwrap();
        let selector = Selector::from(hex!("7c1f72a0"));
        assert!(registry.has(&selector));

        let decoder = registry.get(&selector).unwrap();
        assert_eq!(decoder.signature(), FULFILL_UINT256);
        assert_eq!(decoder.adapter(), "generic");
        assert_eq!(
            decoder.decode(&uint_payload(777)).unwrap(),
            DecodedValue::Number(777)
        );
    }

    #[test]
    fn test_falls_back_to_second_candidate() {
        let registry = DecoderRegistry::builtin().unwrap();
        let candidates = [
            selector_from_signature(FULFILL_STRING),
            selector_from_signature(FULFILL_UINT256),
        ];

        let outcome = registry.decode_first(&candidates, &uint_payload(777));

        let decoded = outcome.decoded.unwrap();
        assert_eq!(decoded.signature, FULFILL_UINT256);
        assert_eq!(decoded.value, DecodedValue::Number(777));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].selector, candidates[0]);
    }

    #[test]
    fn test_stops_at_first_success() {
        let registry = DecoderRegistry::builtin().unwrap();
        let candidates = [
            selector_from_signature(FULFILL_UINT256),
            selector_from_signature("upshotAssetPrice(bytes32,uint256)"),
        ];

        let outcome = registry.decode_first(&candidates, &uint_payload(1));
        assert_eq!(outcome.decoded.unwrap().signature, FULFILL_UINT256);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_undecodable_when_all_candidates_fail() {
        let registry = DecoderRegistry::builtin().unwrap();
        let candidates = [
            selector_from_signature(FULFILL_STRING),
            selector_from_signature(FULFILL_UINT256),
        ];

        let outcome = registry.decode_first(&candidates, &[0xde, 0xad]);
        assert!(!outcome.is_decoded());
        assert_eq!(outcome.failures.len(), 2);
    }

    #[test]
    fn test_unregistered_candidates_are_skipped() {
        let registry = DecoderRegistry::builtin().unwrap();
        let candidates = [
            Selector::from(hex!("deadbeef")),
            selector_from_signature(FULFILL_UINT256),
        ];

        let outcome = registry.decode_first(&candidates, &uint_payload(3));
        assert!(outcome.is_decoded());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_collision_keeps_last_entry() {
        let catalogue = [
            CatalogueEntry::new("first", FULFILL_UINT256),
            CatalogueEntry::new("second", FULFILL_UINT256),
        ];
        let registry = DecoderRegistry::from_catalogue(&catalogue).unwrap();
        assert_eq!(registry.len(), 1);
        let selector = selector_from_signature(FULFILL_UINT256);
        assert_eq!(registry.get(&selector).unwrap().adapter(), "second");
    }

    #[test]
    fn test_resolve_name() {
        let registry = DecoderRegistry::builtin().unwrap();
        assert_eq!(
            registry.resolve_name("upshotAssetPrice"),
            vec![selector_from_signature("upshotAssetPrice(bytes32,uint256)")]
        );
        assert_eq!(
            registry.resolve_name("customCallback(bytes32,uint256)"),
            vec![selector_from_signature("customCallback(bytes32,uint256)")]
        );
        assert!(registry.resolve_name("customCallback").is_empty());
    }

    #[test]
    fn test_rejects_bad_layouts() {
        let missing = [CatalogueEntry::new("x", "noParams")];
        assert!(matches!(
            DecoderRegistry::from_catalogue(&missing),
            Err(RegistryError::MissingParameters("noParams"))
        ));

        let invalid = [CatalogueEntry::new("x", "f(bytes32,uint7)")];
        assert!(matches!(
            DecoderRegistry::from_catalogue(&invalid),
            Err(RegistryError::InvalidLayout { .. })
        ));

        let no_request_id = [CatalogueEntry::new("x", "f(uint256)")];
        assert!(matches!(
            DecoderRegistry::from_catalogue(&no_request_id),
            Err(RegistryError::LayoutWithoutRequestId { .. })
        ));
    }
}
