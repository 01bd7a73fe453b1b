#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;

/// Implementations can serialize themselves as a complete DER TLV
pub trait ToDer {
    /// Size in bytes of the complete encoding: tag, length, and content
    fn der_size(&self) -> usize;

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error>;

    /// Convenience method to serialize this value into a new `Vec<u8>`.
    ///
    /// In allocation-sensitive cases use `to_der` with a caller buffer.
    #[cfg(feature = "alloc")]
    fn to_der_vec(&self) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; self.der_size()];
        let mut cursor = EncodeCursor::new(&mut buf);
        self.to_der(&mut cursor)?;
        Ok(buf)
    }
}

pub trait FromDer<'a>: Sized {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error>;

    /// Decode a value that must occupy `bytes` exactly; trailing data is an
    /// error. This is the entry point for parsing a complete document.
    fn from_der_complete(bytes: &'a [u8]) -> Result<Self, Error> {
        let mut cursor = DecodeCursor::new(bytes);
        let value = Self::from_der(&mut cursor)?;
        if cursor.has_remaining() {
            return Err(Error::TrailingData(cursor.remaining()));
        }
        Ok(value)
    }
}
