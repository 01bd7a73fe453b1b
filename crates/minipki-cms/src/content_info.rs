//! The CMS outer envelope: `ContentInfo` and `CMSVersion` (RFC 5652 3, 10.2.5).

use core::fmt::{self, Debug};

use minipki_der::asn1::{AnyRef, ObjectIdentifier};
use minipki_der::fields::{explicit_size, framed_size, read_sequence, write_explicit, write_sequence};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Header, Tag, ToDer};

use crate::error::Error;
use crate::oids;
use crate::signed_data::SignedData;

/// `CMSVersion ::= INTEGER { v0(0), v1(1), v2(2), v3(3), v4(4), v5(5) }`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum CmsVersion {
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
}

impl CmsVersion {
    pub fn value(self) -> u8 {
        match self {
            CmsVersion::V0 => 0,
            CmsVersion::V1 => 1,
            CmsVersion::V2 => 2,
            CmsVersion::V3 => 3,
            CmsVersion::V4 => 4,
            CmsVersion::V5 => 5,
        }
    }

    pub fn from_value(value: u64) -> Result<Self, Error> {
        match value {
            0 => Ok(CmsVersion::V0),
            1 => Ok(CmsVersion::V1),
            2 => Ok(CmsVersion::V2),
            3 => Ok(CmsVersion::V3),
            4 => Ok(CmsVersion::V4),
            5 => Ok(CmsVersion::V5),
            other => Err(Error::UnknownVersion(other)),
        }
    }

    pub(crate) fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        Self::from_value(u64::from_der(cursor)?)
    }
}

impl ToDer for CmsVersion {
    fn der_size(&self) -> usize {
        3
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        u64::from(self.value()).to_der(cursor)
    }
}

/// ```text
///   ContentInfo ::= SEQUENCE {
///        contentType  OBJECT IDENTIFIER,
///        content      [0] EXPLICIT ANY DEFINED BY contentType }
/// ```
///
/// The content stays uninterpreted until the caller asks for a concrete view
/// such as [`signed_data`](Self::signed_data).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ContentInfo<'a> {
    pub content_type: ObjectIdentifier,
    pub content: AnyRef<'a>,
}

impl<'a> ContentInfo<'a> {
    pub fn new(content_type: ObjectIdentifier, content: AnyRef<'a>) -> Self {
        Self {
            content_type,
            content,
        }
    }

    /// Interpret the content as `SignedData`, checking the content type first
    pub fn signed_data(&self) -> Result<SignedData<'a>, Error> {
        if self.content_type != oids::ID_SIGNED_DATA {
            return Err(Error::UnexpectedContentType(
                oids::ID_SIGNED_DATA,
                self.content_type,
            ));
        }
        SignedData::from_any(&self.content)
    }

    fn value_size(&self) -> usize {
        self.content_type.der_size() + explicit_size(self.content.der_size())
    }
}

impl Debug for ContentInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentInfo({}, {:?})", self.content_type, self.content)
    }
}

impl ToDer for ContentInfo<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.content_type.to_der(cursor)?;
            write_explicit(cursor, 0, &self.content)
        })
    }
}

impl<'a> FromDer<'a> for ContentInfo<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            let content_type = ObjectIdentifier::from_der(inner)?;

            // content is [0] EXPLICIT and mandatory
            let wrapper = Header::decode_expecting(inner, Tag::context_specific(0, true))?;
            let mut body = inner.read_nested(wrapper.length as usize)?;
            let content = AnyRef::from_der(&mut body)?;
            if body.has_remaining() {
                return Err(minipki_der::Error::TrailingData(body.remaining()));
            }

            Ok(ContentInfo {
                content_type,
                content,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_values_round_trip() {
        for version in [
            CmsVersion::V0,
            CmsVersion::V1,
            CmsVersion::V2,
            CmsVersion::V3,
            CmsVersion::V4,
            CmsVersion::V5,
        ] {
            let der = version.to_der_vec().unwrap();
            let mut cursor = DecodeCursor::new(&der);
            assert_eq!(CmsVersion::from_der(&mut cursor).unwrap(), version);
        }

        assert_eq!(
            CmsVersion::from_value(6).unwrap_err(),
            Error::UnknownVersion(6)
        );
    }

    #[test]
    fn content_info_round_trip() {
        // id-data wrapping OCTET STRING "hi"
        let payload = AnyRef::new(Tag::OCTET_STRING, b"hi");
        let info = ContentInfo::new(oids::ID_DATA, payload);

        let der = info.to_der_vec().unwrap();
        assert_eq!(
            der,
            [
                0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01,
                0xa0, 0x04, 0x04, 0x02, b'h', b'i'
            ]
        );
        assert_eq!(info.der_size(), der.len());

        let decoded = ContentInfo::from_der_complete(&der).unwrap();
        assert_eq!(decoded, info);
    }

    #[test]
    fn missing_content_rejected() {
        // SEQUENCE { OID id-data } with no [0] wrapper
        let der = [
            0x30, 0x0b, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01,
        ];
        assert!(ContentInfo::from_der_complete(&der).is_err());
    }

    #[test]
    fn wrong_content_type_for_signed_data() {
        let info = ContentInfo::new(oids::ID_DATA, AnyRef::new(Tag::OCTET_STRING, b""));
        match info.signed_data().unwrap_err() {
            Error::UnexpectedContentType(expected, got) => {
                assert_eq!(expected, oids::ID_SIGNED_DATA);
                assert_eq!(got, oids::ID_DATA);
            }
            e => panic!("unexpected error: {e:?}"),
        }
    }
}
