use lotsync_params_codec::RequestParameter;
use serde::{Deserialize, Serialize};

/// One element of an entries file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryDescription {
    pub description: Description,
    pub request_data: RequestData,
    pub schedule: Schedule,
    pub inactive: bool,
}

/// Bookkeeping metadata. Not stored on chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Description {
    pub adapter: Option<ExternalAdapter>,
    pub chain_id: u64,
    pub job_id: u64,
    pub job_case: u64,
    pub job_name: String,
    pub node_id: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalAdapter {
    pub id: String,
    pub version: String,
}

/// The request as authored. Addresses and amounts are kept as text until
/// validation so that checksum and range errors can point at the raw value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestData {
    pub external_job_id: String,
    pub oracle_addr: String,
    pub payment: String,
    pub callback_addr: String,
    pub callback_function_name: String,
    pub request_type: u8,
    pub request_params: Vec<RequestParameter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Schedule {
    pub start_at: String,
    pub interval: String,
}
