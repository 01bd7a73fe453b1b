//! X.501 distinguished names: `RDNSequence` and its attribute sets.

use alloc::vec::Vec;
use core::fmt::{self, Debug, Display};

use minipki_der::asn1::{AnyRef, ObjectIdentifier};
use minipki_der::fields::{framed_size, read_sequence, read_set, write_sequence, write_set};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Tag, ToDer};

use crate::oids;

/// One `AttributeTypeAndValue`: an attribute OID and its uninterpreted value.
///
/// The value is kept as [`AnyRef`] because directory strings arrive in
/// several ASN.1 string types and must re-encode byte for byte.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AttributeTypeAndValue<'a> {
    pub oid: ObjectIdentifier,
    pub value: AnyRef<'a>,
}

impl<'a> AttributeTypeAndValue<'a> {
    /// Build an attribute carrying a UTF8String value
    pub fn utf8(oid: ObjectIdentifier, value: &'a str) -> Self {
        Self {
            oid,
            value: AnyRef::new(Tag::UTF8_STRING, value.as_bytes()),
        }
    }

    /// Build an attribute carrying a PrintableString value. The caller is
    /// responsible for staying within the PrintableString repertoire; country
    /// codes and the like always do.
    pub fn printable(oid: ObjectIdentifier, value: &'a str) -> Self {
        Self {
            oid,
            value: AnyRef::new(Tag::PRINTABLE_STRING, value.as_bytes()),
        }
    }

    /// The value as text, when it uses one of the ASN.1 string types
    pub fn value_str(&self) -> Option<&'a str> {
        match self.value.tag() {
            Tag::UTF8_STRING | Tag::PRINTABLE_STRING | Tag::IA5_STRING => {
                core::str::from_utf8(self.value.value()).ok()
            }
            _ => None,
        }
    }

    fn value_size(&self) -> usize {
        self.oid.der_size() + self.value.der_size()
    }
}

impl Debug for AttributeTypeAndValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value_str() {
            Some(s) => write!(f, "Attribute({}, {s:?})", self.oid),
            None => write!(f, "Attribute({}, {:?})", self.oid, self.value),
        }
    }
}

impl Display for AttributeTypeAndValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match oids::attribute_short_name(&self.oid) {
            Some(name) => write!(f, "{name}=")?,
            None => write!(f, "{}=", self.oid)?,
        }
        match self.value_str() {
            Some(s) => write!(f, "{s}"),
            // RFC 4514 hex form for values we cannot render as text
            None => write!(
                f,
                "#{}",
                minipki_hex::encode_lower_string(self.value.value())
            ),
        }
    }
}

impl ToDer for AttributeTypeAndValue<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.oid.to_der(cursor)?;
            self.value.to_der(cursor)
        })
    }
}

impl<'a> FromDer<'a> for AttributeTypeAndValue<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            Ok(AttributeTypeAndValue {
                oid: ObjectIdentifier::from_der(inner)?,
                value: AnyRef::from_der(inner)?,
            })
        })
    }
}

/// A `RelativeDistinguishedName`: a SET OF attributes, almost always one.
///
/// Decoding keeps the attributes in wire order rather than re-checking the
/// SET OF canonical sort, so any certificate that round-trips does so byte
/// for byte.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RelativeDistinguishedName<'a> {
    pub attributes: Vec<AttributeTypeAndValue<'a>>,
}

impl<'a> RelativeDistinguishedName<'a> {
    pub fn single(attribute: AttributeTypeAndValue<'a>) -> Self {
        Self {
            attributes: alloc::vec![attribute],
        }
    }

    fn value_size(&self) -> usize {
        self.attributes.iter().map(ToDer::der_size).sum()
    }
}

impl ToDer for RelativeDistinguishedName<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_set(cursor, self.value_size(), |cursor| {
            for attribute in &self.attributes {
                attribute.to_der(cursor)?;
            }
            Ok(())
        })
    }
}

impl<'a> FromDer<'a> for RelativeDistinguishedName<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_set(cursor, |inner| {
            let mut attributes = Vec::new();
            while inner.has_remaining() {
                attributes.push(AttributeTypeAndValue::from_der(inner)?);
            }
            Ok(RelativeDistinguishedName { attributes })
        })
    }
}

/// An X.501 `Name` (RDNSequence). The empty sequence is a valid name and
/// appears in self-issued certificates.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Name<'a> {
    pub rdns: Vec<RelativeDistinguishedName<'a>>,
}

impl<'a> Name<'a> {
    /// First value of `oid` anywhere in the name
    pub fn find(&self, oid: &ObjectIdentifier) -> Option<&AttributeTypeAndValue<'a>> {
        self.rdns
            .iter()
            .flat_map(|rdn| rdn.attributes.iter())
            .find(|attr| attr.oid == *oid)
    }

    /// The commonName attribute as text, if present
    pub fn common_name(&self) -> Option<&'a str> {
        self.find(&oids::COMMON_NAME)?.value_str()
    }

    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    fn value_size(&self) -> usize {
        self.rdns.iter().map(ToDer::der_size).sum()
    }
}

/// A builder-flavored constructor for the common single-attribute-per-RDN case
impl<'a> FromIterator<AttributeTypeAndValue<'a>> for Name<'a> {
    fn from_iter<I: IntoIterator<Item = AttributeTypeAndValue<'a>>>(iter: I) -> Self {
        Name {
            rdns: iter
                .into_iter()
                .map(RelativeDistinguishedName::single)
                .collect(),
        }
    }
}

impl Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for rdn in &self.rdns {
            for attribute in &rdn.attributes {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "{attribute}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl ToDer for Name<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            for rdn in &self.rdns {
                rdn.to_der(cursor)?;
            }
            Ok(())
        })
    }
}

impl<'a> FromDer<'a> for Name<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            let mut rdns = Vec::new();
            while inner.has_remaining() {
                rdns.push(RelativeDistinguishedName::from_der(inner)?);
            }
            Ok(Name { rdns })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    // CN=example.org, O=Example
    const NAME_DER: &[u8] = &[
        0x30, 0x26, 0x31, 0x14, 0x30, 0x12, 0x06, 0x03, 0x55, 0x04, 0x03, 0x0c, 0x0b, 0x65, 0x78,
        0x61, 0x6d, 0x70, 0x6c, 0x65, 0x2e, 0x6f, 0x72, 0x67, 0x31, 0x0e, 0x30, 0x0c, 0x06, 0x03,
        0x55, 0x04, 0x0a, 0x0c, 0x07, 0x45, 0x78, 0x61, 0x6d, 0x70, 0x6c, 0x65,
    ];

    #[test]
    fn parse_two_rdn_name() {
        let name = Name::from_der_complete(NAME_DER).unwrap();

        assert_eq!(name.rdns.len(), 2);
        assert_eq!(name.common_name(), Some("example.org"));
        assert_eq!(
            name.find(&oids::ORGANIZATION).unwrap().value_str(),
            Some("Example")
        );
        assert!(name.find(&oids::COUNTRY).is_none());
    }

    #[test]
    fn display_uses_short_names() {
        let name = Name::from_der_complete(NAME_DER).unwrap();
        assert_eq!(name.to_string(), "CN=example.org,O=Example");
    }

    #[test]
    fn built_name_round_trips() {
        let name: Name<'_> = [
            AttributeTypeAndValue::utf8(oids::COMMON_NAME, "example.org"),
            AttributeTypeAndValue::utf8(oids::ORGANIZATION, "Example"),
        ]
        .into_iter()
        .collect();

        let der = name.to_der_vec().unwrap();
        assert_eq!(der, NAME_DER);
        assert_eq!(name.der_size(), NAME_DER.len());

        let back = Name::from_der_complete(&der).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn empty_name_allowed() {
        let name = Name::from_der_complete(&[0x30, 0x00]).unwrap();
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "");
    }

    #[test]
    fn non_string_value_displays_as_hex() {
        // CN with an OCTET STRING value, which has no text form
        let attr = AttributeTypeAndValue {
            oid: oids::COMMON_NAME,
            value: AnyRef::new(minipki_der::Tag::OCTET_STRING, &[0xde, 0xad]),
        };
        assert_eq!(attr.to_string(), "CN=#dead");
        assert!(attr.value_str().is_none());
    }
}
