//! Collection of fulfillment events and decoding of their payloads.

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use lotsync_decoders::{Decoded, DecoderRegistry, FallbackOutcome};
use lotsync_primitives::Selector;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    errors::CollectError,
    event::FulfillmentEvent,
    filter::{BlockSelector, EventFilter},
    source::FulfillmentLogSource,
};

/// What to collect. Callbacks are named either by selector or by name,
/// never both.
#[derive(Clone, Debug, Default)]
pub struct CollectRequest {
    pub blocks: BlockSelector,
    pub request_ids: Vec<B256>,
    pub callback_addrs: Vec<Address>,
    pub selectors: Vec<Selector>,
    /// Full signatures or bare function names.
    pub names: Vec<String>,
}

/// One collected event and, when decodable, its decoded result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedRecord {
    pub event: FulfillmentEvent,
    pub decoded: Option<Decoded>,
    /// Candidates whose decoder rejected the payload.
    pub failed_candidates: Vec<Selector>,
}

#[derive(Debug)]
pub struct Collector<S> {
    source: S,
    registry: Arc<DecoderRegistry>,
}

impl<S: FulfillmentLogSource> Collector<S> {
    pub fn new(source: S, registry: Arc<DecoderRegistry>) -> Self {
        Self { source, registry }
    }

    /// Queries matching events and decodes each of them.
    ///
    /// Decoding failures are logged and reported in the records, they never
    /// fail the run.
    pub async fn collect(
        &self,
        request: &CollectRequest,
    ) -> Result<Vec<CollectedRecord>, CollectError> {
        if !request.selectors.is_empty() && !request.names.is_empty() {
            return Err(CollectError::SelectorsAndNames);
        }

        let mut named = Vec::new();
        for name in &request.names {
            let resolved = self.registry.resolve_name(name);
            if resolved.is_empty() {
                return Err(CollectError::UnresolvedName(name.clone()));
            }
            for selector in resolved {
                if !named.contains(&selector) {
                    named.push(selector);
                }
            }
        }

        let filter = EventFilter {
            request_ids: request.request_ids.clone(),
            callback_addrs: request.callback_addrs.clone(),
            selectors: if named.is_empty() {
                request.selectors.clone()
            } else {
                named.clone()
            },
        };
        let events = self.source.query(&filter, &request.blocks).await?;
        info!(events = events.len(), "collected fulfillment events");

        Ok(events
            .into_iter()
            .map(|event| self.decode_event(event, &named))
            .collect())
    }

    fn decode_event(&self, event: FulfillmentEvent, named: &[Selector]) -> CollectedRecord {
        let mut candidates = vec![event.callback_function_signature];
        candidates.extend(named.iter().filter(|s| **s != event.callback_function_signature));

        let outcome = match event.payload() {
            Some(payload) => self.registry.decode_first(&candidates, payload),
            None => {
                warn!(
                    tx = %event.transaction_hash,
                    data = %event.data,
                    "fulfillment data is shorter than a selector"
                );
                FallbackOutcome::default()
            }
        };

        match &outcome.decoded {
            Some(decoded) => info!(
                block = event.block_number,
                tx = %event.transaction_hash,
                request_id = %event.request_id,
                success = event.success,
                is_forwarded = event.is_forwarded,
                callback_addr = %event.callback_addr,
                callback = decoded.signature,
                data = %event.data,
                result = %decoded.value,
                "fulfilled request"
            ),
            None => info!(
                block = event.block_number,
                tx = %event.transaction_hash,
                request_id = %event.request_id,
                success = event.success,
                is_forwarded = event.is_forwarded,
                callback_addr = %event.callback_addr,
                selector = %event.callback_function_signature,
                data = %event.data,
                "fulfilled request, payload not decoded"
            ),
        }

        CollectedRecord {
            failed_candidates: outcome.failures.iter().map(|f| f.selector).collect(),
            decoded: outcome.decoded,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_dyn_abi::DynSolValue;
    use alloy_primitives::{hex, U256};
    use lotsync_decoders::DecodedValue;
    use lotsync_primitives::selector_from_signature;

    use super::*;
    use crate::{
        source::{MemLogSource, MockFulfillmentLogSource},
        test_utils::fulfillment_log,
    };

    fn uint_args(value: u64) -> Vec<u8> {
        DynSolValue::Tuple(vec![
            DynSolValue::FixedBytes(B256::repeat_byte(0x01), 32),
            DynSolValue::Uint(U256::from(value), 256),
        ])
        .abi_encode_params()
    }

    fn registry() -> Arc<DecoderRegistry> {
        Arc::new(DecoderRegistry::builtin().unwrap())
    }

    fn uint256() -> Selector {
        Selector::from(hex!("7c1f72a0"))
    }

    fn source() -> MemLogSource {
        let price = selector_from_signature("upshotAssetPrice(bytes32,uint256)");
        MemLogSource::new(vec![
            fulfillment_log(1, 0, B256::repeat_byte(0x01), uint256(), &uint_args(777)),
            fulfillment_log(2, 0, B256::repeat_byte(0x02), price, &uint_args(5)),
            fulfillment_log(3, 0, B256::repeat_byte(0x03), uint256(), &[0xde, 0xad]),
        ])
    }

    #[tokio::test]
    async fn test_collects_and_decodes() {
        let collector = Collector::new(source(), registry());
        let records = collector.collect(&CollectRequest::default()).await.unwrap();

        assert_eq!(records.len(), 3);
        let first = records[0].decoded.as_ref().unwrap();
        assert_eq!(first.signature, "fulfillUint256(bytes32,uint256)");
        assert_eq!(first.value, DecodedValue::Number(777));
        assert_eq!(
            records[1].decoded.as_ref().unwrap().adapter,
            "upshot"
        );
    }

    #[tokio::test]
    async fn test_decode_failure_does_not_abort() {
        let collector = Collector::new(source(), registry());
        let records = collector.collect(&CollectRequest::default()).await.unwrap();

        let broken = &records[2];
        assert!(broken.decoded.is_none());
        assert_eq!(broken.failed_candidates, vec![uint256()]);
    }

    #[tokio::test]
    async fn test_filters_by_name() {
        let collector = Collector::new(source(), registry());
        let request = CollectRequest {
            names: vec!["upshotAssetPrice".to_owned()],
            ..Default::default()
        };
        let records = collector.collect(&request).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event.request_id, B256::repeat_byte(0x02));
    }

    #[tokio::test]
    async fn test_selectors_and_names_are_exclusive() {
        let collector = Collector::new(source(), registry());
        let request = CollectRequest {
            selectors: vec![uint256()],
            names: vec!["fulfillUint256".to_owned()],
            ..Default::default()
        };
        assert!(matches!(
            collector.collect(&request).await,
            Err(CollectError::SelectorsAndNames)
        ));
    }

    #[tokio::test]
    async fn test_unknown_name_is_rejected() {
        let collector = Collector::new(source(), registry());
        let request = CollectRequest {
            names: vec!["noSuchCallback".to_owned()],
            ..Default::default()
        };
        assert!(matches!(
            collector.collect(&request).await,
            Err(CollectError::UnresolvedName(name)) if name == "noSuchCallback"
        ));
    }

    #[tokio::test]
    async fn test_name_candidates_follow_event_selector() {
        // The event carries a selector without a decoder; the named callback
        // is tried next.
        let unknown = Selector::from(hex!("deadbeef"));
        let event = FulfillmentEvent::from_log(&fulfillment_log(
            4,
            0,
            B256::repeat_byte(0x04),
            unknown,
            &uint_args(9),
        ))
        .unwrap();

        let mut source = MockFulfillmentLogSource::new();
        source
            .expect_query()
            .withf(|filter, _| filter.selectors == vec![uint256()])
            .times(1)
            .returning(move |_, _| Ok(vec![event.clone()]));

        let collector = Collector::new(source, registry());
        let request = CollectRequest {
            names: vec!["fulfillUint256(bytes32,uint256)".to_owned()],
            ..Default::default()
        };
        let records = collector.collect(&request).await.unwrap();

        let decoded = records[0].decoded.as_ref().unwrap();
        assert_eq!(decoded.selector, uint256());
        assert_eq!(decoded.value, DecodedValue::Number(9));
        assert!(records[0].failed_candidates.is_empty());
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let mut source = MockFulfillmentLogSource::new();
        source
            .expect_query()
            .returning(|_, _| Err(CollectError::Source("connection reset".to_owned())));

        let collector = Collector::new(source, registry());
        assert!(matches!(
            collector.collect(&CollectRequest::default()).await,
            Err(CollectError::Source(_))
        ));
    }
}
