//! BOOLEAN, NULL, and OCTET STRING

use core::fmt::Debug;

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

/// X.690 11.1: in DER, TRUE is exactly 0xff and FALSE is exactly 0x00
impl ToDer for bool {
    fn der_size(&self) -> usize {
        3
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::BOOLEAN, 1).encode(cursor)?;
        cursor.try_put_u8(if *self { 0xff } else { 0x00 })
    }
}

impl FromDer<'_> for bool {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::BOOLEAN)?;
        if header.length != 1 {
            return Err(Error::InvalidContentLength(
                Tag::BOOLEAN,
                header.length as usize,
            ));
        }
        match cursor.try_get_u8()? {
            0x00 => Ok(false),
            0xff => Ok(true),
            other => Err(Error::InvalidBoolean(other)),
        }
    }
}

/// The ASN.1 NULL value. Content is always empty.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Null;

impl Debug for Null {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NULL")
    }
}

impl ToDer for Null {
    fn der_size(&self) -> usize {
        2
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::NULL, 0).encode(cursor)
    }
}

impl FromDer<'_> for Null {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::NULL)?;
        if header.length != 0 {
            return Err(Error::InvalidContentLength(
                Tag::NULL,
                header.length as usize,
            ));
        }
        Ok(Null)
    }
}

/// A borrowed OCTET STRING
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OctetStringRef<'a> {
    bytes: &'a [u8],
}

impl<'a> OctetStringRef<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Debug for OctetStringRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "OCTET STRING({} bytes)", self.bytes.len())
    }
}

impl AsRef<[u8]> for OctetStringRef<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl ToDer for OctetStringRef<'_> {
    fn der_size(&self) -> usize {
        Header::encoded_size(self.bytes.len() as u32) + self.bytes.len()
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::OCTET_STRING, self.bytes.len() as u32).encode(cursor)?;
        cursor.try_put_slice(self.bytes)
    }
}

impl<'a> FromDer<'a> for OctetStringRef<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::OCTET_STRING)?;
        let bytes = cursor.try_get_slice(header.length as usize)?;
        Ok(OctetStringRef { bytes })
    }
}
