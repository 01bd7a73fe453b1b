//! INTEGER in canonical two's-complement form

use core::fmt::Debug;

use Error::{IntegerOutOfRange, NegativeInteger, NonCanonicalInteger};

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

/// X.690 8.3.2: the first nine bits of an INTEGER must not all be equal;
/// redundant leading 0x00 or 0xff octets are not canonical.
fn check_canonical(bytes: &[u8]) -> Result<(), Error> {
    match bytes {
        [] => Err(NonCanonicalInteger),
        [0x00, second, ..] if *second < 0x80 => Err(NonCanonicalInteger),
        [0xff, second, ..] if *second >= 0x80 => Err(NonCanonicalInteger),
        _ => Ok(()),
    }
}

/// A borrowed INTEGER of arbitrary size, canonical form enforced on decode
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IntRef<'a> {
    bytes: &'a [u8],
}

impl<'a> IntRef<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        check_canonical(bytes)?;
        Ok(Self { bytes })
    }

    /// The content octets, exactly as encoded
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn is_negative(&self) -> bool {
        self.bytes[0] >= 0x80
    }
}

impl Debug for IntRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "INTEGER({} bytes)", self.bytes.len())
    }
}

impl ToDer for IntRef<'_> {
    fn der_size(&self) -> usize {
        Header::encoded_size(self.bytes.len() as u32) + self.bytes.len()
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::INTEGER, self.bytes.len() as u32).encode(cursor)?;
        cursor.try_put_slice(self.bytes)
    }
}

impl<'a> FromDer<'a> for IntRef<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::INTEGER)?;
        let bytes = cursor.try_get_slice(header.length as usize)?;
        IntRef::new(bytes)
    }
}

/// A borrowed non-negative INTEGER (serial numbers, RSA moduli).
///
/// Decoding rejects negative values. `as_bytes` strips the sign-padding zero
/// octet so callers see the magnitude alone.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct UintRef<'a> {
    inner: IntRef<'a>,
}

impl<'a> UintRef<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        let inner = IntRef::new(bytes)?;
        if inner.is_negative() {
            return Err(NegativeInteger);
        }
        Ok(Self { inner })
    }

    /// Magnitude bytes without the leading 0x00 sign pad (if any)
    pub fn as_bytes(&self) -> &'a [u8] {
        let bytes = self.inner.as_bytes();
        if bytes.len() > 1 && bytes[0] == 0x00 {
            &bytes[1..]
        } else {
            bytes
        }
    }

    /// Content bytes exactly as they appear on the wire
    pub fn as_der_bytes(&self) -> &'a [u8] {
        self.inner.as_bytes()
    }

    pub fn try_to_u64(&self) -> Result<u64, Error> {
        let bytes = self.as_bytes();
        if bytes.len() > 8 {
            return Err(IntegerOutOfRange(bytes.len()));
        }
        let mut value: u64 = 0;
        for &b in bytes {
            value = (value << 8) | u64::from(b);
        }
        Ok(value)
    }
}

impl Debug for UintRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "INTEGER({} bytes, non-negative)", self.as_bytes().len())
    }
}

impl ToDer for UintRef<'_> {
    fn der_size(&self) -> usize {
        self.inner.der_size()
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        self.inner.to_der(cursor)
    }
}

impl<'a> FromDer<'a> for UintRef<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let inner = IntRef::from_der(cursor)?;
        if inner.is_negative() {
            return Err(NegativeInteger);
        }
        Ok(UintRef { inner })
    }
}

/// Content octets of `value` as a minimal two's-complement non-negative
/// INTEGER, returned in a fixed buffer with its length.
fn u64_content(value: u64) -> ([u8; 9], usize) {
    let be = value.to_be_bytes();
    let skip = be.iter().take_while(|&&b| b == 0).count().min(7);
    let magnitude = &be[skip..];

    let mut buf = [0u8; 9];
    // A leading byte >= 0x80 needs a 0x00 sign pad to stay non-negative
    let pad = usize::from(magnitude[0] >= 0x80);
    buf[pad..pad + magnitude.len()].copy_from_slice(magnitude);
    (buf, pad + magnitude.len())
}

impl ToDer for u64 {
    fn der_size(&self) -> usize {
        let (_, len) = u64_content(*self);
        Header::encoded_size(len as u32) + len
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        let (buf, len) = u64_content(*self);
        Header::new(Tag::INTEGER, len as u32).encode(cursor)?;
        cursor.try_put_slice(&buf[..len])
    }
}

impl FromDer<'_> for u64 {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        UintRef::from_der(cursor)?.try_to_u64()
    }
}

impl ToDer for u8 {
    fn der_size(&self) -> usize {
        u64::from(*self).der_size()
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        u64::from(*self).to_der(cursor)
    }
}

impl FromDer<'_> for u8 {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let value = u64::from_der(cursor)?;
        u8::try_from(value).map_err(|_| IntegerOutOfRange(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_round_trip() {
        for (value, expected) in [
            (0u64, &[0x02, 0x01, 0x00][..]),
            (127, &[0x02, 0x01, 0x7f]),
            (128, &[0x02, 0x02, 0x00, 0x80]),
            (256, &[0x02, 0x02, 0x01, 0x00]),
            (65535, &[0x02, 0x03, 0x00, 0xff, 0xff]),
        ] {
            let mut buf = [0u8; 16];
            let mut cursor = EncodeCursor::new(&mut buf);
            value.to_der(&mut cursor).unwrap();
            let len = cursor.position();
            assert_eq!(&buf[..len], expected, "wrong encoding for {value}");
            assert_eq!(value.der_size(), expected.len());
            assert_eq!(u64::from_der_complete(expected).unwrap(), value);
        }
    }

    #[test]
    fn max_u64() {
        let mut buf = [0u8; 16];
        let mut cursor = EncodeCursor::new(&mut buf);
        u64::MAX.to_der(&mut cursor).unwrap();
        let len = cursor.position();
        assert_eq!(
            &buf[..len],
            &[0x02, 0x09, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(u64::from_der_complete(&buf[..len]).unwrap(), u64::MAX);
    }

    #[test]
    fn redundant_padding_rejected() {
        // 0x007f would decode as 127 but is not canonical
        match IntRef::from_der_complete(&[0x02, 0x02, 0x00, 0x7f]).unwrap_err() {
            NonCanonicalInteger => (), // ok, expected
            e => panic!("unexpected error: {e:?}"),
        }

        // 0xff80 is a redundantly padded negative value
        match IntRef::from_der_complete(&[0x02, 0x02, 0xff, 0x80]).unwrap_err() {
            NonCanonicalInteger => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn empty_integer_rejected() {
        assert!(IntRef::from_der_complete(&[0x02, 0x00]).is_err());
    }

    #[test]
    fn uint_rejects_negative() {
        match UintRef::from_der_complete(&[0x02, 0x01, 0x80]).unwrap_err() {
            NegativeInteger => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn uint_strips_sign_pad() {
        let data = [0x02, 0x02, 0x00, 0x80];
        let uint = UintRef::from_der_complete(&data).unwrap();
        assert_eq!(uint.as_bytes(), &[0x80]);
        assert_eq!(uint.as_der_bytes(), &[0x00, 0x80]);
        assert_eq!(uint.try_to_u64().unwrap(), 128);
    }

    #[test]
    fn negative_int_accepted_by_intref() {
        let int = IntRef::from_der_complete(&[0x02, 0x01, 0xff]).unwrap();
        assert!(int.is_negative());
    }

    #[test]
    fn u64_overflow_detected() {
        // 9 magnitude bytes cannot fit u64
        let data = [0x02, 0x09, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        match u64::from_der_complete(&data).unwrap_err() {
            IntegerOutOfRange(9) => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }
}
