//! The X.509 v3 `Certificate` and `TBSCertificate` structures (RFC 5280 4.1).

use core::fmt::{self, Debug};

use minipki_der::asn1::{BitStringRef, UintRef};
use minipki_der::fields::{
    explicit_size, framed_size, peek_context_specific, read_explicit, read_implicit,
    write_explicit, write_implicit, write_sequence,
};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Header, Tag, ToDer};
use minipki_spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};

use crate::error::Error;
use crate::ext::Extensions;
use crate::name::Name;
use crate::validity::Validity;

#[cfg(feature = "pem")]
use alloc::string::String;
#[cfg(feature = "pem")]
use alloc::vec::Vec;

/// RFC 7468 label for a certificate document
#[cfg(feature = "pem")]
pub const PEM_LABEL: &str = "CERTIFICATE";

/// Certificate version. The INTEGER on the wire is zero-based, so v3 is 2.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    pub fn value(self) -> u8 {
        match self {
            Version::V1 => 0,
            Version::V2 => 1,
            Version::V3 => 2,
        }
    }

    pub fn from_value(value: u64) -> Result<Self, Error> {
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            2 => Ok(Version::V3),
            other => Err(Error::UnknownVersion(other)),
        }
    }
}

/// CertificateSerialNumber: a positive INTEGER of at most 20 content octets
/// (RFC 5280 4.1.2.2).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SerialNumber<'a> {
    inner: UintRef<'a>,
}

impl<'a> SerialNumber<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        Self::check(UintRef::new(bytes)?)
    }

    fn check(inner: UintRef<'a>) -> Result<Self, Error> {
        let len = inner.as_der_bytes().len();
        if !(1..=20).contains(&len) {
            return Err(Error::InvalidSerialNumber(len));
        }
        Ok(Self { inner })
    }

    /// Magnitude bytes without any sign pad
    pub fn as_bytes(&self) -> &'a [u8] {
        self.inner.as_bytes()
    }

    pub fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        Self::check(UintRef::from_der(cursor)?)
    }
}

impl Debug for SerialNumber<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerialNumber(")?;
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl ToDer for SerialNumber<'_> {
    fn der_size(&self) -> usize {
        self.inner.der_size()
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        self.inner.to_der(cursor)
    }
}

/// The to-be-signed body of a certificate.
///
/// Decoding records the exact DER span of the structure so signatures can be
/// verified over the bytes that were actually signed; [`raw`](Self::raw)
/// exposes it. Structures built in memory have no such span until encoded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TbsCertificate<'a> {
    pub version: Version,
    pub serial_number: SerialNumber<'a>,
    pub signature: AlgorithmIdentifierRef<'a>,
    pub issuer: Name<'a>,
    pub validity: Validity,
    pub subject: Name<'a>,
    pub subject_public_key_info: SubjectPublicKeyInfoRef<'a>,
    pub issuer_unique_id: Option<BitStringRef<'a>>,
    pub subject_unique_id: Option<BitStringRef<'a>>,
    pub extensions: Option<Extensions<'a>>,
    raw: Option<&'a [u8]>,
}

impl<'a> TbsCertificate<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        version: Version,
        serial_number: SerialNumber<'a>,
        signature: AlgorithmIdentifierRef<'a>,
        issuer: Name<'a>,
        validity: Validity,
        subject: Name<'a>,
        subject_public_key_info: SubjectPublicKeyInfoRef<'a>,
    ) -> Self {
        Self {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: None,
            raw: None,
        }
    }

    /// The DER bytes this structure was decoded from, for signature checks
    pub fn raw(&self) -> Option<&'a [u8]> {
        self.raw
    }

    pub fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let mark = cursor.position();
        let header = Header::decode_expecting(cursor, Tag::SEQUENCE)?;
        let mut inner = cursor.read_nested(header.length as usize)?;
        // read_nested advanced past the content, so this spans the whole TLV
        let raw = cursor.span(mark);

        let version = match read_explicit::<u64>(&mut inner, 0)? {
            Some(value) => {
                let version = Version::from_value(value)?;
                if version == Version::V1 {
                    // DEFAULT v1 must be omitted in DER
                    return Err(Error::EncodedDefaultValue("version"));
                }
                version
            }
            None => Version::V1,
        };

        let serial_number = SerialNumber::from_der(&mut inner)?;
        let signature = AlgorithmIdentifierRef::from_der(&mut inner)?;
        let issuer = Name::from_der(&mut inner)?;
        let validity = Validity::from_der(&mut inner)?;
        let subject = Name::from_der(&mut inner)?;
        let subject_public_key_info = SubjectPublicKeyInfoRef::from_der(&mut inner)?;

        let issuer_unique_id = read_implicit(&mut inner, 1, false, bit_string_content)?;
        let subject_unique_id = read_implicit(&mut inner, 2, false, bit_string_content)?;
        if (issuer_unique_id.is_some() || subject_unique_id.is_some()) && version == Version::V1 {
            return Err(Error::UnexpectedField("uniqueID"));
        }

        let extensions = if peek_context_specific(&inner, 3) {
            if version != Version::V3 {
                return Err(Error::UnexpectedField("extensions"));
            }
            let wrapper =
                Header::decode_expecting(&mut inner, Tag::context_specific(3, true))?;
            let mut body = inner.read_nested(wrapper.length as usize)?;
            let extensions = Extensions::from_der(&mut body)?;
            if body.has_remaining() {
                return Err(minipki_der::Error::TrailingData(body.remaining()).into());
            }
            Some(extensions)
        } else {
            None
        };

        if inner.has_remaining() {
            return Err(minipki_der::Error::TrailingData(inner.remaining()).into());
        }

        Ok(TbsCertificate {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            issuer_unique_id,
            subject_unique_id,
            extensions,
            raw: Some(raw),
        })
    }

    fn value_size(&self) -> usize {
        let mut size = 0;
        if self.version != Version::V1 {
            size += explicit_size(u64::from(self.version.value()).der_size());
        }
        size += self.serial_number.der_size();
        size += self.signature.der_size();
        size += self.issuer.der_size();
        size += self.validity.der_size();
        size += self.subject.der_size();
        size += self.subject_public_key_info.der_size();
        if let Some(id) = &self.issuer_unique_id {
            size += framed_size(id.as_raw_slice().len() + 1);
        }
        if let Some(id) = &self.subject_unique_id {
            size += framed_size(id.as_raw_slice().len() + 1);
        }
        if let Some(extensions) = &self.extensions {
            size += explicit_size(extensions.der_size());
        }
        size
    }
}

fn bit_string_content<'a>(
    cursor: &mut DecodeCursor<'a>,
) -> Result<BitStringRef<'a>, minipki_der::Error> {
    let unused = cursor.try_get_u8()?;
    let bytes = cursor.try_get_slice(cursor.remaining())?;
    BitStringRef::new(unused, bytes)
}

fn write_bit_string_implicit(
    cursor: &mut EncodeCursor<'_>,
    number: u8,
    bits: &BitStringRef<'_>,
) -> Result<(), minipki_der::Error> {
    let bytes = bits.as_raw_slice();
    write_implicit(cursor, number, false, bytes.len() + 1, |cursor| {
        cursor.try_put_u8(bits.unused_bits())?;
        cursor.try_put_slice(bytes)
    })
}

impl ToDer for TbsCertificate<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            if self.version != Version::V1 {
                write_explicit(cursor, 0, &u64::from(self.version.value()))?;
            }
            self.serial_number.to_der(cursor)?;
            self.signature.to_der(cursor)?;
            self.issuer.to_der(cursor)?;
            self.validity.to_der(cursor)?;
            self.subject.to_der(cursor)?;
            self.subject_public_key_info.to_der(cursor)?;
            if let Some(id) = &self.issuer_unique_id {
                write_bit_string_implicit(cursor, 1, id)?;
            }
            if let Some(id) = &self.subject_unique_id {
                write_bit_string_implicit(cursor, 2, id)?;
            }
            if let Some(extensions) = &self.extensions {
                write_explicit(cursor, 3, extensions)?;
            }
            Ok(())
        })
    }
}

/// A complete certificate: the signed body, the signature algorithm, and the
/// signature itself.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Certificate<'a> {
    pub tbs_certificate: TbsCertificate<'a>,
    pub signature_algorithm: AlgorithmIdentifierRef<'a>,
    pub signature: BitStringRef<'a>,
}

impl<'a> Certificate<'a> {
    pub fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::SEQUENCE)?;
        let mut inner = cursor.read_nested(header.length as usize)?;

        let tbs_certificate = TbsCertificate::from_der(&mut inner)?;
        let signature_algorithm = AlgorithmIdentifierRef::from_der(&mut inner)?;
        let signature = BitStringRef::from_der(&mut inner)?;

        if inner.has_remaining() {
            return Err(minipki_der::Error::TrailingData(inner.remaining()).into());
        }
        Ok(Certificate {
            tbs_certificate,
            signature_algorithm,
            signature,
        })
    }

    /// Decode, requiring the input to contain exactly one certificate
    pub fn from_der_complete(data: &'a [u8]) -> Result<Self, Error> {
        let mut cursor = DecodeCursor::new(data);
        let certificate = Self::from_der(&mut cursor)?;
        if cursor.has_remaining() {
            return Err(minipki_der::Error::TrailingData(cursor.remaining()).into());
        }
        Ok(certificate)
    }

    /// The signed bytes, when this certificate was decoded from DER
    pub fn tbs_raw(&self) -> Option<&'a [u8]> {
        self.tbs_certificate.raw()
    }

    /// Render as an RFC 7468 `CERTIFICATE` document
    #[cfg(feature = "pem")]
    pub fn to_pem(&self) -> Result<String, Error> {
        Ok(minipki_pem::encode(PEM_LABEL, &self.to_der_vec()?)?)
    }

    fn value_size(&self) -> usize {
        self.tbs_certificate.der_size()
            + self.signature_algorithm.der_size()
            + self.signature.der_size()
    }
}

/// Decode a `CERTIFICATE` PEM document into its DER bytes, ready for
/// [`Certificate::from_der_complete`].
#[cfg(feature = "pem")]
pub fn from_pem(text: &str) -> Result<Vec<u8>, Error> {
    let (label, der) = minipki_pem::decode(text)?;
    if label != PEM_LABEL {
        return Err(Error::UnexpectedLabel(PEM_LABEL, label));
    }
    Ok(der)
}

impl ToDer for Certificate<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.tbs_certificate.to_der(cursor)?;
            self.signature_algorithm.to_der(cursor)?;
            self.signature.to_der(cursor)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_values() {
        assert_eq!(Version::V1.value(), 0);
        assert_eq!(Version::V3.value(), 2);
        assert_eq!(Version::from_value(2).unwrap(), Version::V3);
        assert_eq!(Version::from_value(3).unwrap_err(), Error::UnknownVersion(3));
    }

    #[test]
    fn serial_number_length_limits() {
        assert!(SerialNumber::new(&[0x01]).is_ok());
        assert!(SerialNumber::new(&[0x7f; 20]).is_ok());

        match SerialNumber::new(&[0x7f; 21]).unwrap_err() {
            Error::InvalidSerialNumber(21) => (), // ok, expected
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn serial_number_must_be_positive() {
        assert_eq!(
            SerialNumber::new(&[0x80]).unwrap_err(),
            Error::Der(minipki_der::Error::NegativeInteger)
        );
    }

    #[test]
    fn serial_sign_pad_counts_against_limit() {
        // 20 magnitude bytes with a high bit need a 21-byte encoding
        let mut bytes = [0xffu8; 21];
        bytes[0] = 0x00;
        match SerialNumber::new(&bytes).unwrap_err() {
            Error::InvalidSerialNumber(21) => (),
            e => panic!("unexpected error: {e:?}"),
        }
    }
}
