use std::{fs, path::PathBuf};

use alloy_primitives::{address, Address};
use tempfile::TempDir;

pub(crate) const CONSUMER: Address = address!("00000000000000000000000000000000000000c0");

pub(crate) const ORACLE: &str = "0x878E6Beb3B15D7A1B7a1a0E9D11B1e5f88d3AeDA";

pub(crate) const CALLBACK: &str = "0x5Aa7Bb55e3B7c7A1ce1dB9e8C0E6E3E8a7c9A0B1";

/// An ETH price entry quoted in `currency`.
fn entry_json(job_case: usize, currency: &str, interval: u64) -> String {
    format!(
        r#"{{
  "description": {{
    "adapter": null,
    "chainId": 5,
    "jobId": 1,
    "jobCase": {job_case},
    "jobName": "ETH price in {currency}",
    "nodeId": "linkpool_eth_goerli_delta",
    "notes": null
  }},
  "requestData": {{
    "externalJobId": "2f2b4f0e-9a8c-4f0e-8a54-1c0fd9b0ad6e",
    "oracleAddr": "{ORACLE}",
    "payment": "100000000000000000",
    "callbackAddr": "{CALLBACK}",
    "callbackFunctionName": "fulfillUint256(bytes32,uint256)",
    "requestType": 0,
    "requestParams": [
      {{ "name": "base", "type": "string", "value": "ETH" }},
      {{ "name": "quote", "type": "string", "value": "{currency}" }}
    ]
  }},
  "schedule": {{ "startAt": "0", "interval": "{interval}" }},
  "inactive": false
}}"#
    )
}

/// Writes an entries file with one entry per currency.
pub(crate) fn entries_file(currencies: &[&str]) -> (TempDir, PathBuf) {
    entries_file_with_interval(currencies, 3600)
}

pub(crate) fn entries_file_with_interval(currencies: &[&str], interval: u64) -> (TempDir, PathBuf) {
    let entries: Vec<_> = currencies
        .iter()
        .enumerate()
        .map(|(i, currency)| entry_json(i, currency, interval))
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entries.json");
    fs::write(&path, format!("[{}]", entries.join(","))).unwrap();
    (dir, path)
}
