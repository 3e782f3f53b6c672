//! Chainlink flavoured CBOR writers.
//!
//! Integers use the shortest head when they fit in 64 bits and fall back to
//! the bignum tags with a 32 byte big-endian payload otherwise, matching
//! `CBOR.encodeUInt` / `CBOR.encodeInt` on chain.

use std::convert::Infallible;

use alloy_primitives::{I256, U256};
use minicbor::{
    data::{IanaTag, Int},
    encode::Error,
    Encoder,
};

pub(crate) type CborEncoder<'a> = Encoder<&'a mut Vec<u8>>;

pub(crate) type CborResult = Result<(), Error<Infallible>>;

pub(crate) fn write_uint(enc: &mut CborEncoder<'_>, value: U256) -> CborResult {
    match u64::try_from(value) {
        Ok(small) => {
            enc.u64(small)?;
        }
        Err(_) => {
            enc.tag(IanaTag::PosBignum)?
                .bytes(&value.to_be_bytes::<32>())?;
        }
    }
    Ok(())
}

pub(crate) fn write_int(enc: &mut CborEncoder<'_>, value: I256) -> CborResult {
    if !value.is_negative() {
        return write_uint(enc, value.into_raw());
    }

    // A negative `v` is carried as its complement `-1 - v`.
    let complement = (I256::MINUS_ONE - value).into_raw();
    let inline = u64::try_from(complement)
        .ok()
        .and_then(|arg| Int::try_from(-1i128 - i128::from(arg)).ok());
    match inline {
        Some(int) => {
            enc.int(int)?;
        }
        None => {
            enc.tag(IanaTag::NegBignum)?
                .bytes(&complement.to_be_bytes::<32>())?;
        }
    }
    Ok(())
}

/// Appends an already encoded CBOR fragment.
pub(crate) fn write_fragment(enc: &mut CborEncoder<'_>, fragment: &[u8]) {
    enc.writer_mut().extend_from_slice(fragment);
}

#[cfg(test)]
mod tests {
    use alloy_primitives::hex;

    use super::*;

    fn encoded(f: impl FnOnce(&mut CborEncoder<'_>) -> CborResult) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        f(&mut enc).unwrap();
        buf
    }

    #[test]
    fn test_uint_heads() {
        assert_eq!(encoded(|e| write_uint(e, U256::from(23u8))), hex!("17"));
        assert_eq!(encoded(|e| write_uint(e, U256::from(100u8))), hex!("1864"));
        assert_eq!(
            encoded(|e| write_uint(e, U256::from(u64::MAX))),
            hex!("1bffffffffffffffff")
        );
    }

    #[test]
    fn test_uint_above_u64_is_positive_bignum() {
        let value = U256::from(u64::MAX) + U256::from(1u8);
        let out = encoded(|e| write_uint(e, value));
        assert_eq!(&out[..3], hex!("c25820"));
        assert_eq!(&out[3..], value.to_be_bytes::<32>());
    }

    #[test]
    fn test_negative_ints() {
        assert_eq!(encoded(|e| write_int(e, I256::MINUS_ONE)), hex!("20"));
        assert_eq!(
            encoded(|e| write_int(e, "-500".parse().unwrap())),
            hex!("3901f3")
        );

        let min_inline: I256 = "-18446744073709551616".parse().unwrap();
        assert_eq!(
            encoded(|e| write_int(e, min_inline)),
            hex!("3bffffffffffffffff")
        );
    }

    #[test]
    fn test_int_below_inline_range_is_negative_bignum() {
        let value: I256 = "-18446744073709551617".parse().unwrap();
        let out = encoded(|e| write_int(e, value));
        assert_eq!(&out[..3], hex!("c35820"));
        let complement = U256::from(u64::MAX) + U256::from(1u8);
        assert_eq!(&out[3..], complement.to_be_bytes::<32>());
    }

    #[test]
    fn test_fragment_is_verbatim() {
        let out = encoded(|e| {
            e.str("a")?;
            write_fragment(e, &hex!("6162"));
            Ok(())
        });
        assert_eq!(out, hex!("61616162"));
    }
}
