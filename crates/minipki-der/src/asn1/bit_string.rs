use core::fmt::Debug;

use Error::{InvalidUnusedBits, UnusedBitsPresent};

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

/// A borrowed BIT STRING.
///
/// X.690 8.6: the first content octet counts unused bits (0..=7) in the final
/// octet. DER additionally requires those unused bits to be zero, and an empty
/// bit string to declare zero unused bits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitStringRef<'a> {
    unused_bits: u8,
    bytes: &'a [u8],
}

impl<'a> BitStringRef<'a> {
    pub fn new(unused_bits: u8, bytes: &'a [u8]) -> Result<Self, Error> {
        if unused_bits > 7 || (bytes.is_empty() && unused_bits != 0) {
            return Err(InvalidUnusedBits(unused_bits));
        }
        if unused_bits > 0 {
            let last = bytes[bytes.len() - 1];
            if last & ((1 << unused_bits) - 1) != 0 {
                return Err(InvalidUnusedBits(unused_bits));
            }
        }
        Ok(Self { unused_bits, bytes })
    }

    /// A bit string holding whole bytes, as key material always is
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            unused_bits: 0,
            bytes,
        }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused_bits
    }

    /// The raw octets, regardless of unused-bit count
    pub fn as_raw_slice(&self) -> &'a [u8] {
        self.bytes
    }

    /// The octets of a bit string that must be byte-aligned. Public keys are
    /// carried this way; a nonzero unused-bit count is an error here.
    pub fn as_key_bytes(&self) -> Result<&'a [u8], Error> {
        if self.unused_bits != 0 {
            return Err(UnusedBitsPresent(self.unused_bits));
        }
        Ok(self.bytes)
    }

    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 - usize::from(self.unused_bits)
    }
}

impl Debug for BitStringRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BIT STRING({} bits)", self.bit_len())
    }
}

impl ToDer for BitStringRef<'_> {
    fn der_size(&self) -> usize {
        let content = 1 + self.bytes.len();
        Header::encoded_size(content as u32) + content
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::BIT_STRING, (1 + self.bytes.len()) as u32).encode(cursor)?;
        cursor.try_put_u8(self.unused_bits)?;
        cursor.try_put_slice(self.bytes)
    }
}

impl<'a> FromDer<'a> for BitStringRef<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::BIT_STRING)?;
        // The unused-bits octet is mandatory even for an empty bit string
        if header.length == 0 {
            return Err(Error::InvalidContentLength(Tag::BIT_STRING, 0));
        }
        let unused_bits = cursor.try_get_u8()?;
        let bytes = cursor.try_get_slice(header.length as usize - 1)?;
        BitStringRef::new(unused_bits, bytes)
    }
}
