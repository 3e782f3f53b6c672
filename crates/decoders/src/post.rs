//! Adapter specific post-processing of decoded callback arguments.
//!
//! Each function receives the callback arguments that follow the request id
//! and turns them into the adapter's reporting shape.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::U256;

use crate::{errors::DecodeError, value::DecodedValue};

type PostResult = Result<DecodedValue, DecodeError>;

fn one(values: Vec<DynSolValue>) -> Result<DynSolValue, DecodeError> {
    let mut iter = values.into_iter();
    match (iter.next(), iter.next()) {
        (Some(value), None) => Ok(value),
        (first, second) => Err(DecodeError::shape("a single argument", (first, second))),
    }
}

fn bytes(value: &DynSolValue) -> Result<&[u8], DecodeError> {
    match value {
        DynSolValue::Bytes(bytes) => Ok(bytes),
        DynSolValue::FixedBytes(word, size) => Ok(&word[..(*size).min(32)]),
        other => Err(DecodeError::shape("bytes", other)),
    }
}

fn uint(value: &DynSolValue) -> Result<U256, DecodeError> {
    match value {
        DynSolValue::Uint(value, _) => Ok(*value),
        other => Err(DecodeError::shape("an unsigned integer", other)),
    }
}

fn flag(value: &DynSolValue) -> Result<bool, DecodeError> {
    match value {
        DynSolValue::Bool(flag) => Ok(*flag),
        other => Err(DecodeError::shape("a bool", other)),
    }
}

fn items(value: DynSolValue) -> Result<Vec<DynSolValue>, DecodeError> {
    match value {
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => Ok(items),
        other => Err(DecodeError::shape("an array", other)),
    }
}

fn fields(value: DynSolValue, count: usize) -> Result<Vec<DynSolValue>, DecodeError> {
    match value {
        DynSolValue::Tuple(fields) if fields.len() == count => Ok(fields),
        other => Err(DecodeError::shape("a tuple", other)),
    }
}

fn slice(bytes: &[u8], start: usize, end: usize) -> Result<&[u8], DecodeError> {
    bytes.get(start..end).ok_or(DecodeError::Truncated {
        needed: end,
        len: bytes.len(),
    })
}

/// Maps a list of arguments, rendering the fields at `timestamps` as dates.
fn with_timestamps(fields: Vec<DynSolValue>, timestamps: &[usize]) -> PostResult {
    fields
        .into_iter()
        .enumerate()
        .map(|(i, field)| {
            if timestamps.contains(&i) {
                DecodedValue::timestamp(uint(&field)?)
            } else {
                Ok(DecodedValue::from(field))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(DecodedValue::List)
}

/// Applies `decode` to every element of a single array argument.
fn each(values: Vec<DynSolValue>, decode: impl Fn(DynSolValue) -> PostResult) -> PostResult {
    items(one(values)?)?
        .into_iter()
        .map(decode)
        .collect::<Result<Vec<_>, _>>()
        .map(DecodedValue::List)
}

fn not_found() -> DecodedValue {
    DecodedValue::List(vec![DecodedValue::Bool(false), DecodedValue::text("0x")])
}

fn accuweather_location_body(encoded: &[u8]) -> PostResult {
    let ty = DynSolType::Tuple(vec![
        DynSolType::Uint(256),
        DynSolType::String,
        DynSolType::FixedBytes(2),
    ]);
    let [key, name, country] = <[DynSolValue; 3]>::try_from(fields(ty.abi_decode(encoded)?, 3)?)
        .map_err(|fields| DecodeError::shape("a location", fields))?;
    Ok(DecodedValue::List(vec![
        DecodedValue::from(key),
        DecodedValue::from(name),
        DecodedValue::utf8(bytes(&country)?),
    ]))
}

fn accuweather_conditions_body(encoded: &[u8]) -> PostResult {
    let mut types = vec![DynSolType::Uint(256)];
    types.extend([24, 24, 24, 24].map(DynSolType::Uint));
    types.push(DynSolType::Int(16));
    types.extend([16, 16, 8, 8, 8, 8].map(DynSolType::Uint));
    let count = types.len();
    with_timestamps(fields(DynSolType::Tuple(types).abi_decode(encoded)?, count)?, &[0])
}

/// `(bool isFound, bytes location)`
pub(crate) fn accuweather_location(values: Vec<DynSolValue>) -> PostResult {
    let [found, location] = <[DynSolValue; 2]>::try_from(values)
        .map_err(|values| DecodeError::shape("(bool,bytes)", values))?;
    if !flag(&found)? {
        return Ok(not_found());
    }
    Ok(DecodedValue::List(vec![
        DecodedValue::Bool(true),
        accuweather_location_body(bytes(&location)?)?,
    ]))
}

/// `(bytes currentConditions)`
pub(crate) fn accuweather_current_conditions(values: Vec<DynSolValue>) -> PostResult {
    accuweather_conditions_body(bytes(&one(values)?)?)
}

/// `(bool isFound, bytes location, bytes currentConditions)`
pub(crate) fn accuweather_location_current_conditions(values: Vec<DynSolValue>) -> PostResult {
    let [found, location, conditions] = <[DynSolValue; 3]>::try_from(values)
        .map_err(|values| DecodeError::shape("(bool,bytes,bytes)", values))?;
    if !flag(&found)? {
        return Ok(not_found());
    }
    Ok(DecodedValue::List(vec![
        DecodedValue::Bool(true),
        accuweather_location_body(bytes(&location)?)?,
        accuweather_conditions_body(bytes(&conditions)?)?,
    ]))
}

/// Items are `(bytes32 gameId, uint40 startTime, uint8 homeTeamId, string homeTeam, string awayTeam)`.
pub(crate) fn ap_sports_games_created(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let ty = DynSolType::Tuple(vec![
            DynSolType::FixedBytes(32),
            DynSolType::Uint(40),
            DynSolType::Uint(8),
            DynSolType::String,
            DynSolType::String,
        ]);
        with_timestamps(fields(ty.abi_decode_params(bytes(&item)?)?, 5)?, &[1])
    })
}

/// Items are `(bytes32 gameId, uint8 homeScore, uint8 awayScore, uint8 statusId)`.
pub(crate) fn ap_sports_games_resolved(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let ty = DynSolType::Tuple(vec![
            DynSolType::FixedBytes(32),
            DynSolType::Uint(8),
            DynSolType::Uint(8),
            DynSolType::Uint(8),
        ]);
        Ok(DecodedValue::from(ty.abi_decode_params(bytes(&item)?)?))
    })
}

/// The word is read as three ABI encoded `uint64` (youtube, spotify, tiktok).
pub(crate) fn chartmetric_statistics(values: Vec<DynSolValue>) -> PostResult {
    let ty = DynSolType::Tuple(vec![DynSolType::Uint(64); 3]);
    Ok(DecodedValue::from(ty.abi_decode_params(bytes(&one(values)?)?)?))
}

pub(crate) fn utf8_bytes(values: Vec<DynSolValue>) -> PostResult {
    Ok(DecodedValue::utf8(bytes(&one(values)?)?))
}

/// Items are packed as `uint32 gameId | uint40 startTime | uint8 homeLen | home | away`.
pub(crate) fn enetscores_games_created(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let raw = bytes(&item)?;
        let home_len = usize::from(slice(raw, 9, 10)?[0]);
        let home_end = (10 + home_len).min(raw.len());
        Ok(DecodedValue::List(vec![
            DecodedValue::uint_be(slice(raw, 0, 4)?)?,
            DecodedValue::timestamp_be(slice(raw, 4, 9)?)?,
            DecodedValue::utf8(&raw[10..home_end]),
            DecodedValue::utf8(&raw[home_end..]),
        ]))
    })
}

/// Items are packed as `uint32 gameId | uint8 homeScore | uint8 awayScore | status`.
pub(crate) fn enetscores_games_resolved(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let raw = bytes(&item)?;
        Ok(DecodedValue::List(vec![
            DecodedValue::uint_be(slice(raw, 0, 4)?)?,
            DecodedValue::uint_be(slice(raw, 4, 5)?)?,
            DecodedValue::uint_be(slice(raw, 5, 6)?)?,
            DecodedValue::utf8(&raw[6..]),
        ]))
    })
}

/// `(uint8 kycStatus, uint40 kycTimestamp)`
pub(crate) fn kyc_everest(values: Vec<DynSolValue>) -> PostResult {
    with_timestamps(values, &[1])
}

/// `(uint256 timestamp, uint256 floorprice)`
pub(crate) fn rarify_floorprices(values: Vec<DynSolValue>) -> PostResult {
    with_timestamps(values, &[0])
}

/// The word packs a `uint128` timestamp followed by a `uint128` amount.
pub(crate) fn timestamp_and_amount(values: Vec<DynSolValue>) -> PostResult {
    let word = one(values)?;
    let raw = bytes(&word)?;
    Ok(DecodedValue::List(vec![
        DecodedValue::timestamp_be(slice(raw, 0, 16)?)?,
        DecodedValue::uint_be(slice(raw, 16, 32)?)?,
    ]))
}

/// The word packs two `uint128` amounts.
pub(crate) fn two_amounts(values: Vec<DynSolValue>) -> PostResult {
    let word = one(values)?;
    let raw = bytes(&word)?;
    Ok(DecodedValue::List(vec![
        DecodedValue::uint_be(slice(raw, 0, 16)?)?,
        DecodedValue::uint_be(slice(raw, 16, 32)?)?,
    ]))
}

/// Words pack `uint32 gameId | uint40 startTime | bytes10 homeTeam | bytes13 awayTeam`.
pub(crate) fn sportsdata_games_created(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let raw = bytes(&item)?;
        Ok(DecodedValue::List(vec![
            DecodedValue::uint_be(slice(raw, 0, 4)?)?,
            DecodedValue::timestamp_be(slice(raw, 4, 9)?)?,
            DecodedValue::labelled_hex(slice(raw, 9, 19)?),
            DecodedValue::labelled_hex(slice(raw, 19, 32)?),
        ]))
    })
}

/// Words pack `uint32 gameId | uint8 homeScore | uint8 awayScore | bytes26 status`.
pub(crate) fn sportsdata_games_resolved(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let raw = bytes(&item)?;
        Ok(DecodedValue::List(vec![
            DecodedValue::uint_be(slice(raw, 0, 4)?)?,
            DecodedValue::uint_be(slice(raw, 4, 5)?)?,
            DecodedValue::uint_be(slice(raw, 5, 6)?)?,
            DecodedValue::labelled_hex(slice(raw, 6, 32)?),
        ]))
    })
}

/// Items are `tuple(bytes32 gameId, uint256 startTime, string homeTeam, string awayTeam)`.
pub(crate) fn therundown_games_created(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let ty = DynSolType::Tuple(vec![
            DynSolType::FixedBytes(32),
            DynSolType::Uint(256),
            DynSolType::String,
            DynSolType::String,
        ]);
        with_timestamps(fields(ty.abi_decode(bytes(&item)?)?, 4)?, &[1])
    })
}

/// Items are `tuple(bytes32 gameId, uint8 homeScore, uint8 awayScore, uint8 statusId)`.
pub(crate) fn therundown_games_resolved(values: Vec<DynSolValue>) -> PostResult {
    each(values, |item| {
        let ty = DynSolType::Tuple(vec![
            DynSolType::FixedBytes(32),
            DynSolType::Uint(8),
            DynSolType::Uint(8),
            DynSolType::Uint(8),
        ]);
        Ok(DecodedValue::from(ty.abi_decode(bytes(&item)?)?))
    })
}
