use thiserror::Error;

use crate::tag::Tag;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("buffer too small: {0} bytes needed, {1} bytes available")]
    BufferTooSmall(usize, usize),

    #[error("unexpected tag: expected {0:?}, got {1:?}")]
    UnexpectedTag(Tag, Tag),

    #[error("multi-octet tag numbers are not supported: identifier {0:#04x}")]
    UnsupportedTagNumber(u8),

    #[error("indefinite lengths are not permitted in DER")]
    IndefiniteLength,

    #[error("length uses {0} octets, maximum supported is 4")]
    LengthOverflow(u8),

    #[error("length {0} is not encoded in minimal form")]
    NonMinimalLength(u32),

    #[error("{0} bytes of trailing data after a complete value")]
    TrailingData(usize),

    #[error("{0:?} content of {1} bytes is malformed")]
    InvalidContentLength(Tag, usize),

    #[error("nesting depth {0} exceeds the decoder limit")]
    NestingTooDeep(u8),

    #[error("BOOLEAN content must be 0x00 or 0xff: got {0:#04x}")]
    InvalidBoolean(u8),

    #[error("INTEGER is not in canonical two's-complement form")]
    NonCanonicalInteger,

    #[error("INTEGER is negative where a non-negative value is required")]
    NegativeInteger,

    #[error("INTEGER with {0} content bytes does not fit the target type")]
    IntegerOutOfRange(usize),

    #[error("BIT STRING unused-bit count invalid: {0}")]
    InvalidUnusedBits(u8),

    #[error("BIT STRING has {0} unused bits where none are permitted")]
    UnusedBitsPresent(u8),

    #[error("OBJECT IDENTIFIER encoding is malformed")]
    InvalidOid,

    #[error("OBJECT IDENTIFIER of {0} bytes exceeds the inline maximum")]
    OidTooLong(usize),

    #[error("byte {0:#04x} is not valid for this string type")]
    InvalidCharacter(u8),

    #[error("date/time value is malformed or out of range")]
    InvalidDateTime,
}
