//! `SignedData` and its members (RFC 5652 5).

use alloc::vec::Vec;
use core::fmt::{self, Debug};

use minipki_der::asn1::{AnyRef, ObjectIdentifier, OctetStringRef};
use minipki_der::fields::{
    framed_size, peek_context_specific, read_sequence, read_set, write_explicit, write_implicit,
    write_sequence, write_set,
};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Header, Tag, ToDer};
use minipki_spki::AlgorithmIdentifierRef;
use minipki_x509::certificate::{Certificate, SerialNumber};
use minipki_x509::name::Name;

use crate::content_info::CmsVersion;
use crate::error::Error;
use crate::oids;

/// `Attribute ::= SEQUENCE { attrType OBJECT IDENTIFIER, attrValues SET OF ANY }`
#[derive(Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub oid: ObjectIdentifier,
    pub values: Vec<AnyRef<'a>>,
}

impl<'a> Attribute<'a> {
    pub fn new(oid: ObjectIdentifier, values: Vec<AnyRef<'a>>) -> Self {
        Self { oid, values }
    }

    /// Attribute with the single value the signed attributes of RFC 5652
    /// always carry
    pub fn single(oid: ObjectIdentifier, value: AnyRef<'a>) -> Self {
        Self {
            oid,
            values: alloc::vec![value],
        }
    }

    fn values_size(&self) -> usize {
        self.values.iter().map(ToDer::der_size).sum()
    }

    fn value_size(&self) -> usize {
        self.oid.der_size() + framed_size(self.values_size())
    }
}

impl Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute({}, {} values)", self.oid, self.values.len())
    }
}

impl ToDer for Attribute<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.oid.to_der(cursor)?;
            write_set(cursor, self.values_size(), |cursor| {
                for value in &self.values {
                    value.to_der(cursor)?;
                }
                Ok(())
            })
        })
    }
}

impl<'a> FromDer<'a> for Attribute<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            let oid = ObjectIdentifier::from_der(inner)?;
            let values = read_set(inner, |set| {
                let mut values = Vec::new();
                while set.has_remaining() {
                    values.push(AnyRef::from_der(set)?);
                }
                Ok(values)
            })?;
            Ok(Attribute { oid, values })
        })
    }
}

/// `IssuerAndSerialNumber ::= SEQUENCE { issuer Name, serialNumber CertificateSerialNumber }`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IssuerAndSerialNumber<'a> {
    pub issuer: Name<'a>,
    pub serial_number: SerialNumber<'a>,
}

impl<'a> IssuerAndSerialNumber<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::SEQUENCE)?;
        let mut inner = cursor.read_nested(header.length as usize)?;

        let issuer = Name::from_der(&mut inner)?;
        let serial_number = SerialNumber::from_der(&mut inner)?;
        if inner.has_remaining() {
            return Err(minipki_der::Error::TrailingData(inner.remaining()).into());
        }
        Ok(IssuerAndSerialNumber {
            issuer,
            serial_number,
        })
    }

    fn value_size(&self) -> usize {
        self.issuer.der_size() + self.serial_number.der_size()
    }
}

impl ToDer for IssuerAndSerialNumber<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.issuer.to_der(cursor)?;
            self.serial_number.to_der(cursor)
        })
    }
}

/// ```text
///   SignerIdentifier ::= CHOICE {
///        issuerAndSerialNumber  IssuerAndSerialNumber,
///        subjectKeyIdentifier   [0] SubjectKeyIdentifier }
/// ```
///
/// The second alternative wraps an OCTET STRING and implies CMS version v3
/// on the containing structure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SignerIdentifier<'a> {
    IssuerAndSerialNumber(IssuerAndSerialNumber<'a>),
    SubjectKeyIdentifier(&'a [u8]),
}

impl<'a> SignerIdentifier<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        if peek_context_specific(cursor, 0) {
            let wrapper = Header::decode_expecting(cursor, Tag::context_specific(0, true))?;
            let mut body = cursor.read_nested(wrapper.length as usize)?;
            let ski = OctetStringRef::from_der(&mut body)?;
            if body.has_remaining() {
                return Err(minipki_der::Error::TrailingData(body.remaining()).into());
            }
            Ok(SignerIdentifier::SubjectKeyIdentifier(ski.as_bytes()))
        } else {
            Ok(SignerIdentifier::IssuerAndSerialNumber(
                IssuerAndSerialNumber::from_der(cursor)?,
            ))
        }
    }
}

impl ToDer for SignerIdentifier<'_> {
    fn der_size(&self) -> usize {
        match self {
            SignerIdentifier::IssuerAndSerialNumber(iasn) => iasn.der_size(),
            SignerIdentifier::SubjectKeyIdentifier(ski) => {
                framed_size(OctetStringRef::new(ski).der_size())
            }
        }
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        match self {
            SignerIdentifier::IssuerAndSerialNumber(iasn) => iasn.to_der(cursor),
            SignerIdentifier::SubjectKeyIdentifier(ski) => {
                write_explicit(cursor, 0, &OctetStringRef::new(ski))
            }
        }
    }
}

/// ```text
///   EncapsulatedContentInfo ::= SEQUENCE {
///        eContentType  OBJECT IDENTIFIER,
///        eContent      [0] EXPLICIT OCTET STRING OPTIONAL }
/// ```
///
/// The content is held as [`AnyRef`] so detached signatures (absent content)
/// and the usual OCTET STRING form both round-trip exactly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncapsulatedContentInfo<'a> {
    pub content_type: ObjectIdentifier,
    pub content: Option<AnyRef<'a>>,
}

impl<'a> EncapsulatedContentInfo<'a> {
    /// id-data wrapping the given payload
    pub fn data(payload: &'a [u8]) -> Self {
        Self {
            content_type: oids::ID_DATA,
            content: Some(AnyRef::new(Tag::OCTET_STRING, payload)),
        }
    }

    /// Detached form: the signature covers content conveyed elsewhere
    pub fn detached(content_type: ObjectIdentifier) -> Self {
        Self {
            content_type,
            content: None,
        }
    }

    /// The encapsulated payload bytes, when present as an OCTET STRING
    pub fn payload(&self) -> Option<&'a [u8]> {
        let content = self.content?;
        (content.tag() == Tag::OCTET_STRING).then(|| content.value())
    }

    fn value_size(&self) -> usize {
        self.content_type.der_size()
            + self
                .content
                .map_or(0, |content| framed_size(content.der_size()))
    }
}

impl ToDer for EncapsulatedContentInfo<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.content_type.to_der(cursor)?;
            if let Some(content) = &self.content {
                write_explicit(cursor, 0, content)?;
            }
            Ok(())
        })
    }
}

impl<'a> FromDer<'a> for EncapsulatedContentInfo<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            let content_type = ObjectIdentifier::from_der(inner)?;
            let content = minipki_der::fields::read_explicit(inner, 0)?;
            Ok(EncapsulatedContentInfo {
                content_type,
                content,
            })
        })
    }
}

/// One signer's digest, identity, and signature (RFC 5652 5.3)
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignerInfo<'a> {
    pub version: CmsVersion,
    pub sid: SignerIdentifier<'a>,
    pub digest_algorithm: AlgorithmIdentifierRef<'a>,
    pub signed_attrs: Option<Vec<Attribute<'a>>>,
    pub signature_algorithm: AlgorithmIdentifierRef<'a>,
    pub signature: &'a [u8],
    pub unsigned_attrs: Option<Vec<Attribute<'a>>>,
}

impl<'a> SignerInfo<'a> {
    /// The version RFC 5652 5.3 requires for this signer identifier
    pub fn expected_version(&self) -> CmsVersion {
        match self.sid {
            SignerIdentifier::IssuerAndSerialNumber(_) => CmsVersion::V1,
            SignerIdentifier::SubjectKeyIdentifier(_) => CmsVersion::V3,
        }
    }

    /// First signed attribute with the given type
    pub fn find_signed_attr(&self, oid: &ObjectIdentifier) -> Option<&Attribute<'a>> {
        self.signed_attrs
            .as_deref()?
            .iter()
            .find(|attr| attr.oid == *oid)
    }

    /// The bytes the signature covers when signed attributes are present:
    /// the attributes re-framed under a SET OF tag instead of the [0]
    /// IMPLICIT wrapper (RFC 5652 5.4).
    pub fn signed_attrs_message(&self) -> Result<Option<Vec<u8>>, Error> {
        let Some(attrs) = &self.signed_attrs else {
            return Ok(None);
        };
        let content: usize = attrs.iter().map(ToDer::der_size).sum();

        let mut out = alloc::vec![0u8; framed_size(content)];
        let mut cursor = EncodeCursor::new(&mut out);
        write_set(&mut cursor, content, |cursor| {
            for attr in attrs {
                attr.to_der(cursor)?;
            }
            Ok(())
        })?;
        Ok(Some(out))
    }

    pub(crate) fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::SEQUENCE)?;
        let mut inner = cursor.read_nested(header.length as usize)?;

        let version = CmsVersion::from_der(&mut inner)?;
        let sid = SignerIdentifier::from_der(&mut inner)?;
        let digest_algorithm = AlgorithmIdentifierRef::from_der(&mut inner)?;
        let signed_attrs = read_attributes(&mut inner, 0)?;
        let signature_algorithm = AlgorithmIdentifierRef::from_der(&mut inner)?;
        let signature = OctetStringRef::from_der(&mut inner)?.as_bytes();
        let unsigned_attrs = read_attributes(&mut inner, 1)?;

        if inner.has_remaining() {
            return Err(minipki_der::Error::TrailingData(inner.remaining()).into());
        }

        let info = SignerInfo {
            version,
            sid,
            digest_algorithm,
            signed_attrs,
            signature_algorithm,
            signature,
            unsigned_attrs,
        };
        if info.version != info.expected_version() {
            return Err(Error::VersionMismatch(info.version, info.expected_version()));
        }
        Ok(info)
    }

    fn value_size(&self) -> usize {
        self.version.der_size()
            + self.sid.der_size()
            + self.digest_algorithm.der_size()
            + attributes_wrapper_size(self.signed_attrs.as_deref())
            + self.signature_algorithm.der_size()
            + OctetStringRef::new(self.signature).der_size()
            + attributes_wrapper_size(self.unsigned_attrs.as_deref())
    }
}

impl ToDer for SignerInfo<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.version.to_der(cursor)?;
            self.sid.to_der(cursor)?;
            self.digest_algorithm.to_der(cursor)?;
            write_attributes(cursor, 0, self.signed_attrs.as_deref())?;
            self.signature_algorithm.to_der(cursor)?;
            OctetStringRef::new(self.signature).to_der(cursor)?;
            write_attributes(cursor, 1, self.unsigned_attrs.as_deref())
        })
    }
}

/// Decode an OPTIONAL `[n] IMPLICIT SET OF Attribute`
fn read_attributes<'a>(
    cursor: &mut DecodeCursor<'a>,
    number: u8,
) -> Result<Option<Vec<Attribute<'a>>>, Error> {
    if !peek_context_specific(cursor, number) {
        return Ok(None);
    }
    let wrapper = Header::decode_expecting(cursor, Tag::context_specific(number, true))?;
    let mut body = cursor.read_nested(wrapper.length as usize)?;

    let mut attrs = Vec::new();
    while body.has_remaining() {
        attrs.push(Attribute::from_der(&mut body)?);
    }
    Ok(Some(attrs))
}

fn attributes_size(attrs: &[Attribute<'_>]) -> usize {
    attrs.iter().map(ToDer::der_size).sum()
}

fn attributes_wrapper_size(attrs: Option<&[Attribute<'_>]>) -> usize {
    attrs.map_or(0, |attrs| framed_size(attributes_size(attrs)))
}

fn write_attributes(
    cursor: &mut EncodeCursor<'_>,
    number: u8,
    attrs: Option<&[Attribute<'_>]>,
) -> Result<(), minipki_der::Error> {
    let Some(attrs) = attrs else {
        return Ok(());
    };
    write_implicit(cursor, number, true, attributes_size(attrs), |cursor| {
        for attr in attrs {
            attr.to_der(cursor)?;
        }
        Ok(())
    })
}

/// ```text
///   SignedData ::= SEQUENCE {
///        version           CMSVersion,
///        digestAlgorithms  SET OF DigestAlgorithmIdentifier,
///        encapContentInfo  EncapsulatedContentInfo,
///        certificates      [0] IMPLICIT CertificateSet OPTIONAL,
///        crls              [1] IMPLICIT RevocationInfoChoices OPTIONAL,
///        signerInfos       SET OF SignerInfo }
/// ```
///
/// Certificates must be the plain `certificate` choice; the deprecated and
/// `other` alternatives are rejected. CRLs are carried opaquely as the raw
/// content of the `[1]` wrapper.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignedData<'a> {
    pub version: CmsVersion,
    pub digest_algorithms: Vec<AlgorithmIdentifierRef<'a>>,
    pub encap_content_info: EncapsulatedContentInfo<'a>,
    pub certificates: Option<Vec<Certificate<'a>>>,
    pub crls: Option<&'a [u8]>,
    pub signer_infos: Vec<SignerInfo<'a>>,
}

impl<'a> SignedData<'a> {
    /// The version RFC 5652 5.1 requires for this structure's content
    pub fn expected_version(&self) -> CmsVersion {
        let ski_signer = self
            .signer_infos
            .iter()
            .any(|si| matches!(si.sid, SignerIdentifier::SubjectKeyIdentifier(_)));
        if ski_signer || self.encap_content_info.content_type != oids::ID_DATA {
            CmsVersion::V3
        } else {
            CmsVersion::V1
        }
    }

    /// Parse from the content of a `ContentInfo`
    pub fn from_any(any: &AnyRef<'a>) -> Result<Self, Error> {
        any.tag().expect(Tag::SEQUENCE)?;
        let mut inner = any.value_cursor();
        let signed_data = Self::parse_body(&mut inner)?;
        if inner.has_remaining() {
            return Err(minipki_der::Error::TrailingData(inner.remaining()).into());
        }
        Ok(signed_data)
    }

    pub fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::SEQUENCE)?;
        let mut inner = cursor.read_nested(header.length as usize)?;
        let signed_data = Self::parse_body(&mut inner)?;
        if inner.has_remaining() {
            return Err(minipki_der::Error::TrailingData(inner.remaining()).into());
        }
        Ok(signed_data)
    }

    fn parse_body(inner: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let version = CmsVersion::from_der(inner)?;

        let digest_algorithms = {
            let header = Header::decode_expecting(inner, Tag::SET)?;
            let mut set = inner.read_nested(header.length as usize)?;
            let mut algorithms = Vec::new();
            while set.has_remaining() {
                algorithms.push(AlgorithmIdentifierRef::from_der(&mut set)?);
            }
            algorithms
        };

        let encap_content_info = EncapsulatedContentInfo::from_der(inner)?;

        let certificates = if peek_context_specific(inner, 0) {
            let wrapper = Header::decode_expecting(inner, Tag::context_specific(0, true))?;
            let mut body = inner.read_nested(wrapper.length as usize)?;
            let mut certificates = Vec::new();
            while body.has_remaining() {
                let next = Header::peek(&body)?;
                if next.tag != Tag::SEQUENCE {
                    return Err(Error::UnsupportedCertificateChoice(next.tag));
                }
                certificates.push(Certificate::from_der(&mut body)?);
            }
            Some(certificates)
        } else {
            None
        };

        let crls = if peek_context_specific(inner, 1) {
            let wrapper = Header::decode_expecting(inner, Tag::context_specific(1, true))?;
            Some(inner.try_get_slice(wrapper.length as usize)?)
        } else {
            None
        };

        let signer_infos = {
            let header = Header::decode_expecting(inner, Tag::SET)?;
            let mut set = inner.read_nested(header.length as usize)?;
            let mut infos = Vec::new();
            while set.has_remaining() {
                infos.push(SignerInfo::from_der(&mut set)?);
            }
            infos
        };

        let signed_data = SignedData {
            version,
            digest_algorithms,
            encap_content_info,
            certificates,
            crls,
            signer_infos,
        };
        if signed_data.version != signed_data.expected_version() {
            return Err(Error::VersionMismatch(
                signed_data.version,
                signed_data.expected_version(),
            ));
        }
        Ok(signed_data)
    }

    /// Encode wrapped in a `ContentInfo` with content type id-signedData
    pub fn to_content_info_der(&self) -> Result<Vec<u8>, Error> {
        let der = self.to_der_vec()?;
        let any = AnyRef::from_der_complete(&der)?;
        Ok(crate::content_info::ContentInfo::new(oids::ID_SIGNED_DATA, any).to_der_vec()?)
    }

    fn digest_algorithms_size(&self) -> usize {
        self.digest_algorithms.iter().map(ToDer::der_size).sum()
    }

    fn certificates_size(&self) -> usize {
        self.certificates.as_ref().map_or(0, |certs| {
            framed_size(certs.iter().map(ToDer::der_size).sum())
        })
    }

    fn signer_infos_size(&self) -> usize {
        self.signer_infos.iter().map(ToDer::der_size).sum()
    }

    fn value_size(&self) -> usize {
        self.version.der_size()
            + framed_size(self.digest_algorithms_size())
            + self.encap_content_info.der_size()
            + self.certificates_size()
            + self.crls.map_or(0, |crls| framed_size(crls.len()))
            + framed_size(self.signer_infos_size())
    }
}

impl ToDer for SignedData<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.version.to_der(cursor)?;

            write_set(cursor, self.digest_algorithms_size(), |cursor| {
                for algorithm in &self.digest_algorithms {
                    algorithm.to_der(cursor)?;
                }
                Ok(())
            })?;

            self.encap_content_info.to_der(cursor)?;

            if let Some(certificates) = &self.certificates {
                let size: usize = certificates.iter().map(ToDer::der_size).sum();
                write_implicit(cursor, 0, true, size, |cursor| {
                    for certificate in certificates {
                        certificate.to_der(cursor)?;
                    }
                    Ok(())
                })?;
            }

            if let Some(crls) = self.crls {
                write_implicit(cursor, 1, true, crls.len(), |cursor| {
                    cursor.try_put_slice(crls)
                })?;
            }

            write_set(cursor, self.signer_infos_size(), |cursor| {
                for info in &self.signer_infos {
                    info.to_der(cursor)?;
                }
                Ok(())
            })
        })
    }
}
