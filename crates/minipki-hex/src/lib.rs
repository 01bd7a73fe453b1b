//! Constant-time hexadecimal encoding and decoding.
//!
//! Nibble conversion is branchless arithmetic over the whole input, with no
//! lookup tables, so key material and other secrets can be transcoded without
//! data-dependent timing. Errors are detected during the pass but only
//! reported after it completes.

// This crate uses only safe Rust.
#![forbid(unsafe_code)]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
use alloc::{string::String, vec, vec::Vec};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("wrong buffer length: expected {0} bytes, got {1} bytes")]
    WrongLength(usize, usize),

    #[error("input length {0} is not a multiple of two")]
    OddLength(usize),

    #[error("invalid hex character at position {0}")]
    InvalidCharacter(usize),
}

/// Branchless lower-case nibble to ASCII: 0..=9 -> '0'..'9', 10..=15 -> 'a'..'f'
#[inline(always)]
fn nibble_to_lower(nibble: u8) -> u8 {
    let n = nibble as i16;
    // (n < 10) ? n + '0' : n - 10 + 'a', computed without a branch
    (n + 0x30 + (((0x09 - n) >> 8) & 0x27)) as u8
}

/// Branchless upper-case nibble to ASCII
#[inline(always)]
fn nibble_to_upper(nibble: u8) -> u8 {
    let n = nibble as i16;
    (n + 0x30 + (((0x09 - n) >> 8) & 0x07)) as u8
}

/// Branchless ASCII to nibble. Returns 0..=15 for a valid digit and a value
/// with bits outside 0x0f set for anything else, so validity can be
/// accumulated without branching on it.
#[inline(always)]
fn char_to_nibble(byte: u8, lower: bool, upper: bool) -> i16 {
    let c = byte as i16;
    let mut result: i16 = -1;

    // '0'..='9'
    result += (((0x2f - c) & (c - 0x3a)) >> 8) & (c - 0x2f);
    if lower {
        // 'a'..='f'
        result += (((0x60 - c) & (c - 0x67)) >> 8) & (c - 0x56);
    }
    if upper {
        // 'A'..='F'
        result += (((0x40 - c) & (c - 0x47)) >> 8) & (c - 0x36);
    }
    result
}

fn encode_with(src: &[u8], dst: &mut [u8], to_ascii: fn(u8) -> u8) -> Result<(), Error> {
    if dst.len() != src.len() * 2 {
        return Err(Error::WrongLength(src.len() * 2, dst.len()));
    }
    for (byte, out) in src.iter().zip(dst.chunks_exact_mut(2)) {
        out[0] = to_ascii(byte >> 4);
        out[1] = to_ascii(byte & 0x0f);
    }
    Ok(())
}

/// Encode `src` as lower-case hex into `dst`, which must be exactly twice as
/// long. Returns the written text.
pub fn encode_lower<'a>(src: &[u8], dst: &'a mut [u8]) -> Result<&'a str, Error> {
    encode_with(src, dst, nibble_to_lower)?;
    Ok(core::str::from_utf8(dst).expect("hex output is ASCII"))
}

/// Encode `src` as upper-case hex into `dst`, which must be exactly twice as
/// long. Returns the written text.
pub fn encode_upper<'a>(src: &[u8], dst: &'a mut [u8]) -> Result<&'a str, Error> {
    encode_with(src, dst, nibble_to_upper)?;
    Ok(core::str::from_utf8(dst).expect("hex output is ASCII"))
}

fn decode_with<'a>(
    src: &[u8],
    dst: &'a mut [u8],
    lower: bool,
    upper: bool,
) -> Result<&'a [u8], Error> {
    if src.len() % 2 != 0 {
        return Err(Error::OddLength(src.len()));
    }
    if dst.len() != src.len() / 2 {
        return Err(Error::WrongLength(src.len() / 2, dst.len()));
    }

    // The conversion runs over the entire input regardless of errors; the
    // first bad position is remembered and reported afterwards.
    let mut bad: Option<usize> = None;
    for (i, (pair, out)) in src.chunks_exact(2).zip(dst.iter_mut()).enumerate() {
        let hi = char_to_nibble(pair[0], lower, upper);
        let lo = char_to_nibble(pair[1], lower, upper);

        let hi_bad = (hi >> 8) & 1;
        let lo_bad = (lo >> 8) & 1;
        if bad.is_none() && hi_bad != 0 {
            bad = Some(i * 2);
        }
        if bad.is_none() && lo_bad != 0 {
            bad = Some(i * 2 + 1);
        }

        *out = (((hi & 0x0f) << 4) | (lo & 0x0f)) as u8;
    }

    if let Some(position) = bad {
        return Err(Error::InvalidCharacter(position));
    }
    Ok(dst)
}

/// Decode lower-case hex from `src` into `dst`, which must be exactly half as
/// long. Upper-case digits are rejected.
pub fn decode<'a>(src: &[u8], dst: &'a mut [u8]) -> Result<&'a [u8], Error> {
    decode_with(src, dst, true, false)
}

/// Decode upper-case hex; lower-case digits are rejected
pub fn decode_upper<'a>(src: &[u8], dst: &'a mut [u8]) -> Result<&'a [u8], Error> {
    decode_with(src, dst, false, true)
}

/// Decode hex accepting either case
pub fn decode_mixed<'a>(src: &[u8], dst: &'a mut [u8]) -> Result<&'a [u8], Error> {
    decode_with(src, dst, true, true)
}

/// Encode to a new lower-case `String`
#[cfg(feature = "alloc")]
pub fn encode_lower_string(src: &[u8]) -> String {
    let mut dst = vec![0u8; src.len() * 2];
    encode_with(src, &mut dst, nibble_to_lower).expect("buffer sized to fit");
    String::from_utf8(dst).expect("hex output is ASCII")
}

/// Encode to a new upper-case `String`
#[cfg(feature = "alloc")]
pub fn encode_upper_string(src: &[u8]) -> String {
    let mut dst = vec![0u8; src.len() * 2];
    encode_with(src, &mut dst, nibble_to_upper).expect("buffer sized to fit");
    String::from_utf8(dst).expect("hex output is ASCII")
}

/// Decode mixed-case hex to a new `Vec<u8>`
#[cfg(feature = "alloc")]
pub fn decode_vec(src: &[u8]) -> Result<Vec<u8>, Error> {
    if src.len() % 2 != 0 {
        return Err(Error::OddLength(src.len()));
    }
    let mut dst = vec![0u8; src.len() / 2];
    decode_with(src, &mut dst, true, true)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_all_byte_values() {
        let src: [u8; 4] = [0x00, 0x7f, 0x80, 0xff];
        let mut buf = [0u8; 8];

        assert_eq!(encode_lower(&src, &mut buf).unwrap(), "007f80ff");
        assert_eq!(encode_upper(&src, &mut buf).unwrap(), "007F80FF");
    }

    #[test]
    fn nibble_tables_match_reference() {
        for n in 0u8..16 {
            let expected_lower = b"0123456789abcdef"[n as usize];
            let expected_upper = b"0123456789ABCDEF"[n as usize];
            assert_eq!(nibble_to_lower(n), expected_lower, "lower nibble {n}");
            assert_eq!(nibble_to_upper(n), expected_upper, "upper nibble {n}");
        }
    }

    #[test]
    fn decode_round_trip_every_byte() {
        let mut src = [0u8; 256];
        for (i, b) in src.iter_mut().enumerate() {
            *b = i as u8;
        }

        let mut hex = [0u8; 512];
        encode_lower(&src, &mut hex).unwrap();

        let mut out = [0u8; 256];
        let decoded = decode(&hex, &mut out).unwrap();
        assert_eq!(decoded, &src[..], "decode must invert encode");
    }

    #[test]
    fn case_strictness() {
        let mut out = [0u8; 1];
        assert!(decode(b"ab", &mut out).is_ok());
        assert!(decode(b"AB", &mut out).is_err(), "upper digits in lower mode");
        assert!(decode_upper(b"AB", &mut out).is_ok());
        assert!(decode_upper(b"ab", &mut out).is_err());
        assert!(decode_mixed(b"aB", &mut out).is_ok());
    }

    #[test]
    fn invalid_character_position() {
        let mut out = [0u8; 2];
        match decode(b"0g00", &mut out).unwrap_err() {
            Error::InvalidCharacter(1) => (), // ok, expected
            e => panic!("unexpected error: {e:?}"),
        }
        match decode(b"00z0", &mut out).unwrap_err() {
            Error::InvalidCharacter(2) => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn length_errors() {
        let mut out = [0u8; 4];
        match decode(b"abc", &mut out).unwrap_err() {
            Error::OddLength(3) => (),
            e => panic!("unexpected error: {e:?}"),
        }
        match decode(b"abcd", &mut out).unwrap_err() {
            Error::WrongLength(2, 4) => (),
            e => panic!("unexpected error: {e:?}"),
        }
        match encode_lower(&[0u8; 4], &mut out).unwrap_err() {
            Error::WrongLength(8, 4) => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn invalid_character_positions_past_16_bits() {
        // Positions beyond the i16 and u16 ranges must still be tracked and
        // reported exactly
        let mut src = [b'0'; 70_000];
        let mut out = [0u8; 35_000];

        for position in [32_768usize, 40_000, 65_536, 66_000] {
            src[position] = b'z';
            match decode(&src, &mut out).unwrap_err() {
                Error::InvalidCharacter(p) => {
                    assert_eq!(p, position, "wrong reported position")
                }
                e => panic!("unexpected error: {e:?}"),
            }
            src[position] = b'0';
        }

        let decoded = decode(&src, &mut out).unwrap();
        assert!(decoded.iter().all(|&b| b == 0), "clean input must decode");
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn large_input_round_trip() {
        let src: Vec<u8> = (0u32..40_000).map(|i| (i % 251) as u8).collect();
        let hex = encode_lower_string(&src);
        assert_eq!(decode_vec(hex.as_bytes()).unwrap(), src);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn alloc_conveniences() {
        assert_eq!(encode_lower_string(&[0xde, 0xad]), "dead");
        assert_eq!(encode_upper_string(&[0xbe, 0xef]), "BEEF");
        assert_eq!(decode_vec(b"DeadBeef").unwrap(), &[0xde, 0xad, 0xbe, 0xef]);
    }
}
