use Error::{IndefiniteLength, LengthOverflow, NonMinimalLength};

use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::tag::Tag;

/// A decoded tag-length pair. The value content follows on the wire.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Header {
    pub tag: Tag,
    pub length: u32,
}

impl Header {
    pub const fn new(tag: Tag, length: u32) -> Self {
        Self { tag, length }
    }

    /// Number of bytes a tag plus length prefix occupies for a value of
    /// `value_len` content bytes.
    pub const fn encoded_size(value_len: u32) -> usize {
        1 + length_size(value_len)
    }

    pub fn decode(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let tag = Tag::from_der(cursor)?;
        let length = decode_length(cursor)?;
        Ok(Header { tag, length })
    }

    /// Decode a header without advancing the cursor
    pub fn peek(cursor: &DecodeCursor<'_>) -> Result<Self, Error> {
        let mut lookahead = cursor.clone();
        Self::decode(&mut lookahead)
    }

    /// Decode a header and require its tag to be `expected`
    pub fn decode_expecting(cursor: &mut DecodeCursor<'_>, expected: Tag) -> Result<Self, Error> {
        let header = Self::decode(cursor)?;
        header.tag.expect(expected)?;
        Ok(header)
    }

    pub fn encode(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        self.tag.to_der(cursor)?;
        encode_length(cursor, self.length)
    }
}

/// Number of length octets DER uses for a value of `len` content bytes.
pub const fn length_size(len: u32) -> usize {
    match len {
        0..=0x7f => 1,
        0x80..=0xff => 2,
        0x100..=0xffff => 3,
        0x1_0000..=0xff_ffff => 4,
        _ => 5,
    }
}

/// X.690 8.1.3 + 10.1: definite form only, and the minimum number of length
/// octets. Anything else is BER and gets rejected.
fn decode_length(cursor: &mut DecodeCursor<'_>) -> Result<u32, Error> {
    let first = cursor.try_get_u8()?;

    if first < 0x80 {
        return Ok(u32::from(first));
    }

    if first == 0x80 {
        return Err(IndefiniteLength);
    }

    let num_octets = first & 0x7f;
    if num_octets > 4 {
        return Err(LengthOverflow(num_octets));
    }

    let mut value: u32 = 0;
    for _ in 0..num_octets {
        value = (value << 8) | u32::from(cursor.try_get_u8()?);
    }

    // A long-form length must not fit in fewer octets than were used
    let minimal = match num_octets {
        1 => value >= 0x80,
        n => value >= 1 << (8 * (u32::from(n) - 1)),
    };
    if !minimal {
        return Err(NonMinimalLength(value));
    }

    Ok(value)
}

fn encode_length(cursor: &mut EncodeCursor<'_>, len: u32) -> Result<(), Error> {
    if len < 0x80 {
        return cursor.try_put_u8(len as u8);
    }

    let num_octets = (length_size(len) - 1) as u8;
    cursor.try_put_u8(0x80 | num_octets)?;
    for shift in (0..num_octets).rev() {
        cursor.try_put_u8((len >> (8 * u32::from(shift))) as u8)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_len_bytes(bytes: &[u8]) -> Result<u32, Error> {
        let mut cursor = DecodeCursor::new(bytes);
        decode_length(&mut cursor)
    }

    fn encode_len_bytes(len: u32) -> ([u8; 5], usize) {
        let mut buf = [0u8; 5];
        let mut cursor = EncodeCursor::new(&mut buf);
        encode_length(&mut cursor, len).unwrap();
        let used = cursor.position();
        (buf, used)
    }

    #[test]
    fn short_form() {
        assert_eq!(decode_len_bytes(&[0x00]).unwrap(), 0);
        assert_eq!(decode_len_bytes(&[0x7f]).unwrap(), 127);

        let (buf, used) = encode_len_bytes(127);
        assert_eq!(&buf[..used], &[0x7f]);
    }

    #[test]
    fn long_form() {
        assert_eq!(decode_len_bytes(&[0x81, 0x80]).unwrap(), 128);
        assert_eq!(decode_len_bytes(&[0x82, 0x01, 0x00]).unwrap(), 256);
        assert_eq!(
            decode_len_bytes(&[0x84, 0x01, 0x00, 0x00, 0x00]).unwrap(),
            0x0100_0000
        );

        let (buf, used) = encode_len_bytes(128);
        assert_eq!(&buf[..used], &[0x81, 0x80]);
        let (buf, used) = encode_len_bytes(0x0100_0000);
        assert_eq!(&buf[..used], &[0x84, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn indefinite_rejected() {
        match decode_len_bytes(&[0x80]).unwrap_err() {
            IndefiniteLength => (), // ok, expected
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn non_minimal_rejected() {
        // 0x7f must use the short form
        match decode_len_bytes(&[0x81, 0x7f]).unwrap_err() {
            NonMinimalLength(0x7f) => (),
            e => panic!("unexpected error: {e:?}"),
        }

        // leading zero length octet
        match decode_len_bytes(&[0x82, 0x00, 0xff]).unwrap_err() {
            NonMinimalLength(0xff) => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn oversized_length_rejected() {
        match decode_len_bytes(&[0x85, 0x01, 0x02, 0x03, 0x04, 0x05]).unwrap_err() {
            LengthOverflow(5) => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn header_round_trip() {
        let header = Header::new(Tag::SEQUENCE, 300);
        let mut buf = [0u8; 8];
        let mut cursor = EncodeCursor::new(&mut buf);
        header.encode(&mut cursor).unwrap();
        assert_eq!(cursor.position(), Header::encoded_size(300));

        let mut cursor = DecodeCursor::new(&buf);
        let decoded = Header::decode(&mut cursor).unwrap();
        assert_eq!(decoded, header, "the decoded header should match");
    }

    #[test]
    fn length_sizes() {
        assert_eq!(length_size(0), 1);
        assert_eq!(length_size(0x7f), 1);
        assert_eq!(length_size(0x80), 2);
        assert_eq!(length_size(0xff), 2);
        assert_eq!(length_size(0x100), 3);
        assert_eq!(length_size(0xffff), 3);
        assert_eq!(length_size(0x1_0000), 4);
        assert_eq!(length_size(u32::MAX), 5);
    }
}
