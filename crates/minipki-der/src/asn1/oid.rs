use core::fmt::{self, Debug, Display};

use Error::{InvalidOid, OidTooLong};

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

/// An OBJECT IDENTIFIER held in a fixed inline buffer, so OIDs work without
/// allocation and can be `const` values.
///
/// The buffer stores the DER content octets (base-128 arcs with the first two
/// arcs packed into one value). 39 bytes covers every OID in real-world PKI
/// use with room to spare.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    length: u8,
    bytes: [u8; Self::MAX_SIZE],
}

impl ObjectIdentifier {
    pub const MAX_SIZE: usize = 39;

    /// Build an OID from its DER content octets at compile time.
    ///
    /// Panics on malformed input, which for `const` usage is a compile error.
    /// Runtime callers should use `from_bytes` instead.
    pub const fn from_raw(bytes: &[u8]) -> Self {
        assert!(
            !bytes.is_empty() && bytes.len() <= Self::MAX_SIZE,
            "OID content length out of range"
        );

        let mut buf = [0u8; Self::MAX_SIZE];
        let mut i = 0;
        let mut arc_start = true;
        while i < bytes.len() {
            // X.690 8.19.2: each arc is base 128, high bit marks continuation,
            // and a leading 0x80 octet is a forbidden non-minimal encoding
            assert!(!(arc_start && bytes[i] == 0x80), "non-minimal OID arc");
            arc_start = bytes[i] & 0x80 == 0;
            buf[i] = bytes[i];
            i += 1;
        }
        assert!(arc_start, "truncated OID arc");

        Self {
            length: bytes.len() as u8,
            bytes: buf,
        }
    }

    /// Build an OID from its DER content octets, validating structure
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(InvalidOid);
        }
        if bytes.len() > Self::MAX_SIZE {
            return Err(OidTooLong(bytes.len()));
        }

        let mut arc_start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if i == arc_start && b == 0x80 {
                return Err(InvalidOid);
            }
            if b & 0x80 == 0 {
                // Arc values are capped at u32: at most five base-128 octets,
                // and a five-octet arc must fit 32 bits
                let len = i - arc_start + 1;
                if len > 5 || (len == 5 && bytes[arc_start] > 0x8f) {
                    return Err(InvalidOid);
                }
                arc_start = i + 1;
            }
        }
        if arc_start != bytes.len() {
            return Err(InvalidOid);
        }

        let mut buf = [0u8; Self::MAX_SIZE];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            length: bytes.len() as u8,
            bytes: buf,
        })
    }

    /// Parse a dotted-decimal string like "1.2.840.113549.1.1.1"
    pub fn new(dotted: &str) -> Result<Self, Error> {
        let mut arcs = DottedParser::new(dotted);

        let first = arcs.next_arc()?.ok_or(InvalidOid)?;
        let second = arcs.next_arc()?.ok_or(InvalidOid)?;

        // X.660: the first arc is 0..=2, and the second is limited to 0..=39
        // unless the first arc is 2
        if first > 2 || (first < 2 && second > 39) {
            return Err(InvalidOid);
        }

        let mut oid = Self {
            length: 0,
            bytes: [0u8; Self::MAX_SIZE],
        };
        let packed = first
            .checked_mul(40)
            .and_then(|v| v.checked_add(second))
            .ok_or(InvalidOid)?;
        oid.push_arc(packed)?;
        while let Some(arc) = arcs.next_arc()? {
            oid.push_arc(arc)?;
        }
        Ok(oid)
    }

    /// The DER content octets (no tag or length)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.length)]
    }

    fn push_arc(&mut self, arc: u32) -> Result<(), Error> {
        let mut groups = 1;
        while groups < 5 && (arc >> (7 * groups)) != 0 {
            groups += 1;
        }

        if usize::from(self.length) + groups > Self::MAX_SIZE {
            return Err(OidTooLong(usize::from(self.length) + groups));
        }

        for g in (0..groups).rev() {
            let mut octet = ((arc >> (7 * g)) & 0x7f) as u8;
            if g > 0 {
                octet |= 0x80;
            }
            self.bytes[usize::from(self.length)] = octet;
            self.length += 1;
        }
        Ok(())
    }

    /// Iterate the numeric arcs, expanding the packed first octet
    pub fn arcs(&self) -> ArcIter<'_> {
        ArcIter {
            bytes: self.as_bytes(),
            index: 0,
            first_pair: true,
            pending_second: None,
        }
    }
}

struct DottedParser<'a> {
    rest: &'a str,
}

impl<'a> DottedParser<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn next_arc(&mut self) -> Result<Option<u32>, Error> {
        if self.rest.is_empty() {
            return Ok(None);
        }
        let (part, rest) = match self.rest.split_once('.') {
            // a trailing dot leaves an empty remainder
            Some((_, "")) => return Err(InvalidOid),
            Some((part, rest)) => (part, rest),
            None => (self.rest, ""),
        };
        self.rest = rest;
        part.parse::<u32>().map(Some).map_err(|_| InvalidOid)
    }
}

/// Iterator over the numeric arc values of an OID
pub struct ArcIter<'a> {
    bytes: &'a [u8],
    index: usize,
    first_pair: bool,
    pending_second: Option<u32>,
}

impl Iterator for ArcIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if let Some(second) = self.pending_second.take() {
            return Some(second);
        }
        if self.index >= self.bytes.len() {
            return None;
        }

        let mut value: u32 = 0;
        while self.index < self.bytes.len() {
            let octet = self.bytes[self.index];
            self.index += 1;
            value = (value << 7) | u32::from(octet & 0x7f);
            if octet & 0x80 == 0 {
                break;
            }
        }

        if self.first_pair {
            self.first_pair = false;
            let (first, second) = match value {
                0..=39 => (0, value),
                40..=79 => (1, value - 40),
                v => (2, v - 80),
            };
            self.pending_second = Some(second);
            return Some(first);
        }
        Some(value)
    }
}

impl Debug for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OID({self})")
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.arcs().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{arc}")?;
        }
        Ok(())
    }
}

impl ToDer for ObjectIdentifier {
    fn der_size(&self) -> usize {
        Header::encoded_size(u32::from(self.length)) + usize::from(self.length)
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::OBJECT_IDENTIFIER, u32::from(self.length)).encode(cursor)?;
        cursor.try_put_slice(self.as_bytes())
    }
}

impl FromDer<'_> for ObjectIdentifier {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::OBJECT_IDENTIFIER)?;
        let bytes = cursor.try_get_slice(header.length as usize)?;
        Self::from_bytes(bytes)
    }
}
