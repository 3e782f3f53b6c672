//! Fail-fast validation of entry descriptions, run before anything touches
//! the remote store.

use std::{
    collections::{hash_map, HashMap},
    fmt::Display,
};

use alloy_primitives::{Address, U256};
use lotsync_params_codec::{ParamKind, RequestParameter};
use lotsync_primitives::{
    constants::LINK_TOTAL_SUPPLY, serde_helpers::parse_decimal_u256, RequestType,
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::{
    adapters::{CHAINLINK_NODE_IDS, EXTERNAL_ADAPTER_IDS},
    errors::{InvalidReason, ValidationError},
    model::{Description, EntryDescription, RequestData, Schedule},
};

/// Deployment facts the entries are checked against.
#[derive(Clone, Debug, Default)]
pub struct ValidationContext {
    /// Chain every entry must be declared for, if known.
    pub chain_id: Option<u64>,
    /// Reject two entries sharing the same `(jobId, jobCase)`.
    pub unique_job_ids: bool,
    /// Node ids accepted on top of [`CHAINLINK_NODE_IDS`].
    pub extra_node_ids: Vec<String>,
}

/// Validates every entry, stopping at the first error.
pub fn validate_entries(
    entries: &[EntryDescription],
    ctx: &ValidationContext,
) -> Result<(), ValidationError> {
    let mut jobs: HashMap<(u64, u64), usize> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        validate_entry(index, entry, ctx)?;

        if !ctx.unique_job_ids {
            continue;
        }
        let job = (entry.description.job_id, entry.description.job_case);
        match jobs.entry(job) {
            hash_map::Entry::Occupied(first) => {
                return Err(ValidationError {
                    index,
                    field: "description.(jobId, jobCase)".to_owned(),
                    value: format!("({}, {})", job.0, job.1),
                    reason: InvalidReason::DuplicateJob { first: *first.get() },
                });
            }
            hash_map::Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }
    debug!(count = entries.len(), "entries are valid");
    Ok(())
}

/// Validates a single entry found at `index`.
pub fn validate_entry(
    index: usize,
    entry: &EntryDescription,
    ctx: &ValidationContext,
) -> Result<(), ValidationError> {
    let check = Checker { index };
    check.description(&entry.description, ctx)?;
    parse_request(index, &entry.request_data, &entry.schedule)?;
    for (i, param) in entry.request_data.request_params.iter().enumerate() {
        check.param(i, param)?;
    }
    Ok(())
}

/// Typed request and schedule fields of an entry.
#[derive(Debug)]
pub(crate) struct ParsedRequest {
    pub(crate) job_id: Uuid,
    pub(crate) oracle: Address,
    pub(crate) payment: U256,
    pub(crate) callback_addr: Address,
    pub(crate) request_type: RequestType,
    pub(crate) start_at: U256,
    pub(crate) interval: U256,
}

pub(crate) fn parse_request(
    index: usize,
    request: &RequestData,
    schedule: &Schedule,
) -> Result<ParsedRequest, ValidationError> {
    let check = Checker { index };

    let job_id = parse_hyphenated_uuid(&request.external_job_id).ok_or_else(|| {
        check.fail(
            "requestData.externalJobId",
            &request.external_job_id,
            InvalidReason::NotUuid,
        )
    })?;
    let oracle = check.address("requestData.oracleAddr", &request.oracle_addr)?;

    let payment = parse_decimal_u256(&request.payment)
        .filter(|payment| !payment.is_zero())
        .ok_or_else(|| check.fail("requestData.payment", &request.payment, InvalidReason::NotPositive))?;
    if payment > LINK_TOTAL_SUPPLY {
        return Err(check.fail(
            "requestData.payment",
            &request.payment,
            InvalidReason::AboveTotalSupply,
        ));
    }

    let callback_addr = check.address("requestData.callbackAddr", &request.callback_addr)?;
    if request.callback_function_name.trim().is_empty() {
        return Err(check.fail(
            "requestData.callbackFunctionName",
            &request.callback_function_name,
            InvalidReason::Empty,
        ));
    }
    let request_type = RequestType::try_from(request.request_type).map_err(|_| {
        check.fail(
            "requestData.requestType",
            request.request_type,
            InvalidReason::UnknownRequestType,
        )
    })?;

    let start_at = parse_decimal_u256(&schedule.start_at).ok_or_else(|| {
        check.fail("schedule.startAt", &schedule.start_at, InvalidReason::NotNonNegative)
    })?;
    let interval = parse_decimal_u256(&schedule.interval)
        .filter(|interval| !interval.is_zero())
        .ok_or_else(|| check.fail("schedule.interval", &schedule.interval, InvalidReason::NotPositive))?;

    Ok(ParsedRequest {
        job_id,
        oracle,
        payment,
        callback_addr,
        request_type,
        start_at,
        interval,
    })
}

fn parse_hyphenated_uuid(raw: &str) -> Option<Uuid> {
    let bytes = raw.as_bytes();
    let hyphenated = raw.len() == 36 && [8, 13, 18, 23].iter().all(|&i| bytes[i] == b'-');
    hyphenated.then(|| Uuid::try_parse(raw).ok()).flatten()
}

fn is_semver(raw: &str) -> bool {
    let parts: Vec<_> = raw.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

struct Checker {
    index: usize,
}

impl Checker {
    fn fail(&self, field: impl Into<String>, value: impl Display, reason: InvalidReason) -> ValidationError {
        ValidationError {
            index: self.index,
            field: field.into(),
            value: value.to_string(),
            reason,
        }
    }

    fn address(&self, field: &str, raw: &str) -> Result<Address, ValidationError> {
        let address = raw
            .starts_with("0x")
            .then(|| Address::parse_checksummed(raw, None).ok())
            .flatten()
            .ok_or_else(|| self.fail(field, raw, InvalidReason::NotChecksummed))?;
        if address.is_zero() {
            return Err(self.fail(field, raw, InvalidReason::ZeroAddress));
        }
        Ok(address)
    }

    fn description(&self, description: &Description, ctx: &ValidationContext) -> Result<(), ValidationError> {
        if let Some(adapter) = &description.adapter {
            if !EXTERNAL_ADAPTER_IDS.contains(&adapter.id.as_str()) {
                return Err(self.fail("description.adapter.id", &adapter.id, InvalidReason::UnknownAdapter));
            }
            if !is_semver(&adapter.version) {
                return Err(self.fail(
                    "description.adapter.version",
                    &adapter.version,
                    InvalidReason::BadVersion,
                ));
            }
        }

        if let Some(expected) = ctx.chain_id {
            if description.chain_id != expected {
                return Err(self.fail(
                    "description.chainId",
                    description.chain_id,
                    InvalidReason::ChainIdMismatch { expected },
                ));
            }
        }

        if description.job_name.trim().is_empty() {
            return Err(self.fail("description.jobName", &description.job_name, InvalidReason::Empty));
        }

        let known_node = CHAINLINK_NODE_IDS.contains(&description.node_id.as_str())
            || ctx.extra_node_ids.iter().any(|id| *id == description.node_id);
        if !known_node {
            return Err(self.fail("description.nodeId", &description.node_id, InvalidReason::UnknownNode));
        }

        if let Some(notes) = &description.notes {
            if notes.trim().is_empty() {
                return Err(self.fail("description.notes", notes, InvalidReason::Empty));
            }
        }
        Ok(())
    }

    fn param(&self, position: usize, param: &RequestParameter) -> Result<(), ValidationError> {
        let field = |name: &str| format!("requestData.requestParams[{position}].{name}");

        if param.name.trim().is_empty() {
            return Err(self.fail(field("name"), &param.name, InvalidReason::Empty));
        }
        let kind: ParamKind = param
            .kind
            .parse()
            .map_err(|_| self.fail(field("type"), &param.kind, InvalidReason::UnsupportedParamType))?;
        if matches!(param.value, Value::Null | Value::Object(_)) {
            return Err(self.fail(field("value"), &param.value, InvalidReason::InvalidParamValue));
        }

        match (&param.value_types, kind.takes_value_types()) {
            (None, true) => Err(self.fail(field("valueTypes"), "null", InvalidReason::ValueTypesMismatch)),
            (Some(types), true) => {
                let values = param.value.as_array().map(Vec::len);
                if values == Some(types.len()) {
                    Ok(())
                } else {
                    Err(self.fail(
                        field("valueTypes"),
                        format!("{types:?}"),
                        InvalidReason::ValueTypesMismatch,
                    ))
                }
            }
            (Some(types), false) => Err(self.fail(
                field("valueTypes"),
                format!("{types:?}"),
                InvalidReason::UnexpectedValueTypes,
            )),
            (None, false) => Ok(()),
        }
    }
}
