//! Certificate extensions (RFC 5280 4.2). Extension values stay opaque; this
//! layer frames them and tracks criticality.

use alloc::vec::Vec;
use core::fmt::{self, Debug};

use minipki_der::asn1::{ObjectIdentifier, OctetStringRef};
use minipki_der::fields::{framed_size, write_sequence};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Header, Tag, ToDer};

use crate::error::Error;

/// ```text
///   Extension ::= SEQUENCE {
///        extnID     OBJECT IDENTIFIER,
///        critical   BOOLEAN DEFAULT FALSE,
///        extnValue  OCTET STRING }
/// ```
///
/// `critical` is DEFAULT FALSE, and DER forbids encoding a field at its
/// default, so an explicit `critical: FALSE` on the wire is rejected.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Extension<'a> {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    pub value: &'a [u8],
}

impl<'a> Extension<'a> {
    pub fn new(oid: ObjectIdentifier, critical: bool, value: &'a [u8]) -> Self {
        Self {
            oid,
            critical,
            value,
        }
    }

    pub(crate) fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::SEQUENCE)?;
        let mut inner = cursor.read_nested(header.length as usize)?;

        let oid = ObjectIdentifier::from_der(&mut inner)?;
        let critical = if Header::peek(&inner).is_ok_and(|h| h.tag == Tag::BOOLEAN) {
            if !bool::from_der(&mut inner)? {
                return Err(Error::EncodedDefaultValue("critical"));
            }
            true
        } else {
            false
        };
        let value = OctetStringRef::from_der(&mut inner)?.as_bytes();

        if inner.has_remaining() {
            return Err(minipki_der::Error::TrailingData(inner.remaining()).into());
        }
        Ok(Extension {
            oid,
            critical,
            value,
        })
    }

    fn value_size(&self) -> usize {
        self.oid.der_size()
            + if self.critical { true.der_size() } else { 0 }
            + OctetStringRef::new(self.value).der_size()
    }
}

impl Debug for Extension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extension({}, critical: {}, {} bytes)",
            self.oid,
            self.critical,
            self.value.len()
        )
    }
}

impl ToDer for Extension<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.oid.to_der(cursor)?;
            if self.critical {
                true.to_der(cursor)?;
            }
            OctetStringRef::new(self.value).to_der(cursor)
        })
    }
}

/// `Extensions ::= SEQUENCE SIZE (1..MAX) OF Extension`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Extensions<'a> {
    pub entries: Vec<Extension<'a>>,
}

impl<'a> Extensions<'a> {
    pub fn new(entries: Vec<Extension<'a>>) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(Error::EmptyExtensions);
        }
        Ok(Self { entries })
    }

    pub fn find(&self, oid: &ObjectIdentifier) -> Option<&Extension<'a>> {
        self.entries.iter().find(|ext| ext.oid == *oid)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Extension<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Critical extensions the caller does not recognize must cause rejection
    /// (RFC 5280 4.2); this surfaces them for that check.
    pub fn unrecognized_critical<'b>(
        &'b self,
        known: &'b [ObjectIdentifier],
    ) -> impl Iterator<Item = &'b Extension<'a>> {
        self.entries
            .iter()
            .filter(move |ext| ext.critical && !known.contains(&ext.oid))
    }

    pub(crate) fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::SEQUENCE)?;
        let mut inner = cursor.read_nested(header.length as usize)?;

        let mut entries = Vec::new();
        while inner.has_remaining() {
            entries.push(Extension::from_der(&mut inner)?);
        }
        Extensions::new(entries)
    }

    fn value_size(&self) -> usize {
        self.entries.iter().map(ToDer::der_size).sum()
    }
}

impl ToDer for Extensions<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            for ext in &self.entries {
                ext.to_der(cursor)?;
            }
            Ok(())
        })
    }
}
