//! Built-in table of fulfillment callbacks the registry knows how to decode.

use alloy_dyn_abi::DynSolValue;

use crate::{errors::DecodeError, post, value::DecodedValue};

/// Turns the callback arguments following the request id into the reported
/// value.
pub type PostProcess = fn(Vec<DynSolValue>) -> Result<DecodedValue, DecodeError>;

/// Declarative description of one decodable callback.
#[derive(Clone, Copy, Debug)]
pub struct CatalogueEntry {
    /// External adapter the callback belongs to.
    pub adapter: &'static str,

    /// Canonical signature, hashed into the selector.
    pub signature: &'static str,

    /// Payload layout when it differs from the declared parameters, including
    /// the leading request id, e.g. `(bytes32,bool,bytes)`.
    pub layout: Option<&'static str>,

    /// Adapter specific rendering. Without one a single argument is reported
    /// as is and several as a list.
    pub post: Option<PostProcess>,
}

impl CatalogueEntry {
    pub const fn new(adapter: &'static str, signature: &'static str) -> Self {
        Self {
            adapter,
            signature,
            layout: None,
            post: None,
        }
    }

    pub const fn with_layout(mut self, layout: &'static str) -> Self {
        self.layout = Some(layout);
        self
    }

    pub const fn with_post(mut self, post: PostProcess) -> Self {
        self.post = Some(post);
        self
    }
}

const fn generic(signature: &'static str) -> CatalogueEntry {
    CatalogueEntry::new("generic", signature)
}

pub const CATALOGUE: &[CatalogueEntry] = &[
    generic("fulfillAddress(bytes32,address)"),
    generic("fulfillAddressArray(bytes32,address[])"),
    generic("fulfillBool(bytes32,bool)"),
    generic("fulfillBoolArray(bytes32,bool[])"),
    generic("fulfillBytes(bytes32,bytes)"),
    generic("fulfillBytesArray(bytes32,bytes[])"),
    generic("fulfillBytes32(bytes32,bytes32)"),
    generic("fulfillBytes32Array(bytes32,bytes32[])"),
    generic("fulfillInt256(bytes32,int256)"),
    generic("fulfillInt256Array(bytes32,int256[])"),
    generic("fulfillString(bytes32,string)"),
    generic("fulfillStringArray(bytes32,string[])"),
    generic("fulfillUint256(bytes32,uint256)"),
    generic("fulfillUint256Array(bytes32,uint256[])"),
    CatalogueEntry::new("accuweather", "accuweatherLocation(bytes32,bytes)")
        .with_layout("(bytes32,bool,bytes)")
        .with_post(post::accuweather_location),
    CatalogueEntry::new("accuweather", "accuweatherCurrentConditions(bytes32,bytes)")
        .with_post(post::accuweather_current_conditions),
    CatalogueEntry::new(
        "accuweather",
        "accuweatherLocationCurrentConditions(bytes32,bytes)",
    )
    .with_layout("(bytes32,bool,bytes,bytes)")
    .with_post(post::accuweather_location_current_conditions),
    CatalogueEntry::new("anchain", "anchainCategory(bytes32,string)"),
    CatalogueEntry::new("ap-sports", "apSportsScheduleGamesCreated(bytes32,bytes[])")
        .with_post(post::ap_sports_games_created),
    CatalogueEntry::new("ap-sports", "apSportsScheduleGamesResolved(bytes32,bytes[])")
        .with_post(post::ap_sports_games_resolved),
    CatalogueEntry::new("artcentral", "artcentralTami(bytes32,uint256)"),
    // Results longer than 32 characters are delivered as a string.
    CatalogueEntry::new("blocknative", "blocknativeBlockpricesGetLegacy(bytes32,bytes32)")
        .with_layout("(bytes32,string)"),
    CatalogueEntry::new("blocknative", "blocknativeBlockpricesGetEip1559(bytes32,bytes32)")
        .with_layout("(bytes32,string)"),
    CatalogueEntry::new("chartmetric", "chartmetricStatistics(bytes32,bytes32)")
        .with_post(post::chartmetric_statistics),
    CatalogueEntry::new("crd-network", "crdNetworkAddressInfo(bytes32,bytes22,uint8)"),
    CatalogueEntry::new("dns-query", "dnsQueryDnsProofCheckRecord(bytes32,bool)"),
    CatalogueEntry::new("enetpulse", "enetpulseGameDetails(bytes32,bytes)")
        .with_post(post::utf8_bytes),
    CatalogueEntry::new("enetpulse", "enetpulseGameScore(bytes32,bytes)")
        .with_post(post::utf8_bytes),
    CatalogueEntry::new("enetpulse", "enetpulseSchedule(bytes32,bytes)")
        .with_post(post::utf8_bytes),
    CatalogueEntry::new("enetscores", "enetscoresScheduleGamesCreated(bytes32,bytes[])")
        .with_post(post::enetscores_games_created),
    CatalogueEntry::new("enetscores", "enetscoresScheduleGamesResolved(bytes32,bytes[])")
        .with_post(post::enetscores_games_resolved),
    CatalogueEntry::new("finage", "finagePrice(bytes32,uint256)"),
    CatalogueEntry::new(
        "freelance-jobs-lanceria",
        "freelanceJobsLanceriaJobsGet(bytes32,address,address,uint256)",
    ),
    CatalogueEntry::new("heni", "heniPrice(bytes32,uint256)"),
    CatalogueEntry::new("kyc-ciphertrace", "kycCiphertraceAddressesGet(bytes32,bool)"),
    CatalogueEntry::new("kyc-everest", "kycEverestAddressesGet(bytes32,uint8,uint40)")
        .with_post(post::kyc_everest),
    CatalogueEntry::new("nft-analytics-nftperp", "nftAnalyticsNftperpTwapsGet(bytes32,uint256)"),
    CatalogueEntry::new(
        "nft-analytics-rarify",
        "nftAnalyticsRarifyFloorpricesGet(bytes32,uint256,uint256)",
    )
    .with_post(post::rarify_floorprices),
    CatalogueEntry::new("nftbank", "nftbankEstimateTokenPrice(bytes32,uint256)"),
    CatalogueEntry::new("nftbank", "nftbankFloorPricePrice(bytes32,uint256)"),
    CatalogueEntry::new("nftbank", "nftbankFloorPriceTimestampFloorprice(bytes32,bytes32)")
        .with_post(post::timestamp_and_amount),
    CatalogueEntry::new("prospectnow", "prospectnowTerritoryAnalizerAvgPrice(bytes32,uint256)"),
    CatalogueEntry::new("smartzip", "smartzipPropertyAvmPrice(bytes32,uint256)"),
    CatalogueEntry::new("smartzip", "smartzipPropertyDetailsPrice(bytes32,uint256)"),
    CatalogueEntry::new(
        "sportsdataio-linkpool",
        "sportsdataLpScheduleGamesCreated(bytes32,bytes32[])",
    )
    .with_post(post::sportsdata_games_created),
    CatalogueEntry::new(
        "sportsdataio-linkpool",
        "sportsdataLpScheduleGamesResolved(bytes32,bytes32[])",
    )
    .with_post(post::sportsdata_games_resolved),
    CatalogueEntry::new("tac-index", "tacIndexPrice(bytes32,uint256)"),
    CatalogueEntry::new(
        "therundown",
        "therundownLpScheduleGamesCreated_v2_0(bytes32,bytes[])",
    )
    .with_post(post::therundown_games_created),
    CatalogueEntry::new(
        "therundown",
        "therundownLpScheduleGamesResolved_v2_0(bytes32,bytes[])",
    )
    .with_post(post::therundown_games_resolved),
    CatalogueEntry::new("tradermade", "tradermadePrice(bytes32,uint256)"),
    CatalogueEntry::new("twelvedata", "twelvedataPrice(bytes32,uint256)"),
    CatalogueEntry::new("upshot", "upshotAssetPrice(bytes32,uint256)"),
    CatalogueEntry::new("upshot", "upshotStatisticsFloorprice(bytes32,uint256)"),
    CatalogueEntry::new("upshot", "upshotStatisticsMarketcap(bytes32,uint256)"),
    CatalogueEntry::new("upshot", "upshotStatisticsStatistics(bytes32,bytes32)")
        .with_post(post::two_amounts),
    CatalogueEntry::new("upshot", "upshotStatisticsTimestampFloorprice(bytes32,bytes32)")
        .with_post(post::timestamp_and_amount),
    CatalogueEntry::new("venrai", "venraiSanctions(bytes32,bool)"),
    CatalogueEntry::new("wavebridge", "wavebridgeCmxDaily(bytes32,int256)"),
    CatalogueEntry::new("wavebridge", "wavebridgeKimpDaily(bytes32,int256)"),
    CatalogueEntry::new("wavebridge", "wavebridgeKimpRealtime(bytes32,int256)"),
];
