pub(crate) const SAMPLE_JOB_ID: &str = "2f2b4f0e-9a8c-4f0e-8a54-1c0fd9b0ad6e";

pub(crate) const ORACLE: &str = "0x878E6Beb3B15D7A1B7a1a0E9D11B1e5f88d3AeDA";

pub(crate) const CALLBACK: &str = "0x5Aa7Bb55e3B7c7A1ce1dB9e8C0E6E3E8a7c9A0B1";

/// An entry requesting the ETH price in `currency`.
pub(crate) fn entry_json(job_id: &str, currency: &str) -> String {
    format!(
        r#"{{
  "description": {{
    "adapter": {{ "id": "coingecko", "version": "1.6.0" }},
    "chainId": 5,
    "jobId": 1,
    "jobCase": 0,
    "jobName": "ETH price",
    "nodeId": "linkpool_eth_goerli_delta",
    "notes": null
  }},
  "requestData": {{
    "externalJobId": "{job_id}",
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
  "schedule": {{ "startAt": "0", "interval": "3600" }},
  "inactive": false
}}"#
    )
}
