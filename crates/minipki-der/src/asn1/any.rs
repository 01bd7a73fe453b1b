use core::fmt::Debug;

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

/// An uninterpreted TLV: the tag plus a borrowed view of the raw content.
///
/// `AnyRef` preserves bytes exactly, so values captured with it (algorithm
/// parameters, attribute values, encapsulated content) re-encode identically.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AnyRef<'a> {
    tag: Tag,
    value: &'a [u8],
}

impl<'a> AnyRef<'a> {
    pub fn new(tag: Tag, value: &'a [u8]) -> Self {
        Self { tag, value }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The raw content octets, without tag or length
    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Reinterpret the captured content as an inner cursor. Used by callers
    /// that decide the concrete type after inspecting the tag.
    pub fn value_cursor(&self) -> DecodeCursor<'a> {
        DecodeCursor::new(self.value)
    }
}

impl Debug for AnyRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ANY({:?}, {} bytes)", self.tag, self.value.len())
    }
}

impl ToDer for AnyRef<'_> {
    fn der_size(&self) -> usize {
        Header::encoded_size(self.value.len() as u32) + self.value.len()
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(self.tag, self.value.len() as u32).encode(cursor)?;
        cursor.try_put_slice(self.value)
    }
}

impl<'a> FromDer<'a> for AnyRef<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode(cursor)?;
        let value = cursor.try_get_slice(header.length as usize)?;
        Ok(AnyRef {
            tag: header.tag,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_tag_and_content() {
        let data = [0x04, 0x03, 0x0a, 0x0b, 0x0c, 0xff];
        let mut cursor = DecodeCursor::new(&data);
        let any = AnyRef::from_der(&mut cursor).unwrap();

        assert_eq!(any.tag(), Tag::OCTET_STRING);
        assert_eq!(any.value(), &[0x0a, 0x0b, 0x0c]);
        assert_eq!(cursor.remaining(), 1, "only the TLV should be consumed");
    }

    #[test]
    fn round_trip_is_exact() {
        let data = [0xa0, 0x03, 0x02, 0x01, 0x05];
        let any = AnyRef::from_der_complete(&data).unwrap();
        assert_eq!(any.der_size(), data.len());

        let mut buf = [0u8; 5];
        let mut cursor = EncodeCursor::new(&mut buf);
        any.to_der(&mut cursor).unwrap();
        assert_eq!(buf, data, "re-encoding must reproduce the input bytes");
    }

    #[test]
    fn truncated_content_rejected() {
        let data = [0x04, 0x05, 0x01, 0x02];
        let result = AnyRef::from_der_complete(&data);
        match result.unwrap_err() {
            Error::BufferTooSmall(5, 2) => (), // ok, expected
            e => panic!("unexpected error: {e:?}"),
        }
    }
}
