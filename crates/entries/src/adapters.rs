//! Known identifiers referenced by entry descriptions.

/// External adapters an entry can be tagged with, `n/a` when none applies.
pub const EXTERNAL_ADAPTER_IDS: &[&str] = &[
    "n/a",
    // managed adapters
    "accuweather",
    "anchain",
    "ap-sports",
    "artcentral",
    "blocknative",
    "crd-network",
    "chartmetric",
    "enetpulse",
    "enetscores",
    "freelance-jobs-lanceria",
    "generic",
    "heni",
    "kyc-ciphertrace",
    "kyc-everest",
    "nft-analytics-nftperp",
    "nft-analytics-rarify",
    "nftbank",
    "prospectnow",
    "smartzip",
    "solipay",
    "sportsdataio-linkpool",
    "t3-index",
    "tac-index",
    "therundown-lp",
    "upshot",
    "venrai",
    "wavebridge",
    // hosted adapters
    "coingecko",
    "dns-query",
    "external-car-broker",
    "finage-own",
    "therundown",
    "tradermade-own",
    "twelvedata-own",
];

/// Chainlink nodes that entries may be served by.
pub const CHAINLINK_NODE_IDS: &[&str] = &["linkpool_eth_goerli_delta"];
