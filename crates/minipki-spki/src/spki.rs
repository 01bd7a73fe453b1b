use core::fmt::Debug;

use minipki_der::asn1::BitStringRef;
use minipki_der::fields::{framed_size, read_sequence, write_sequence};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, ToDer};

use crate::algorithm::AlgorithmIdentifierRef;
use crate::error::Error;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "pem")]
use alloc::string::String;

/// RFC 7468 label for a public key document
#[cfg(feature = "pem")]
pub const PEM_LABEL: &str = "PUBLIC KEY";

/// RFC 5280 4.1.2.7: an algorithm identifier and the key material it frames.
///
/// ```text
///   SubjectPublicKeyInfo ::= SEQUENCE {
///        algorithm         AlgorithmIdentifier,
///        subjectPublicKey  BIT STRING }
/// ```
///
/// The key is kept as an uninterpreted BIT STRING; callers that know the
/// algorithm pull the raw key bytes out with [`key_bytes`](Self::key_bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SubjectPublicKeyInfoRef<'a> {
    pub algorithm: AlgorithmIdentifierRef<'a>,
    pub subject_public_key: BitStringRef<'a>,
}

impl<'a> SubjectPublicKeyInfoRef<'a> {
    pub fn new(algorithm: AlgorithmIdentifierRef<'a>, key: &'a [u8]) -> Self {
        Self {
            algorithm,
            subject_public_key: BitStringRef::from_bytes(key),
        }
    }

    /// The key material as whole octets. Every deployed public-key algorithm
    /// encodes its key with zero unused bits, so a partial final octet is an
    /// error here.
    pub fn key_bytes(&self) -> Result<&'a [u8], Error> {
        Ok(self.subject_public_key.as_key_bytes()?)
    }

    fn value_size(&self) -> usize {
        self.algorithm.der_size() + self.subject_public_key.der_size()
    }

    /// SHA-256 over the DER encoding of the whole structure, the digest
    /// certificate pinning schemes use (RFC 7469).
    #[cfg(feature = "fingerprint")]
    pub fn fingerprint_bytes(&self) -> Result<[u8; 32], Error> {
        use aws_lc_rs::digest;

        let der = self.to_der_vec()?;
        let digest = digest::digest(&digest::SHA256, &der);
        let mut out = [0u8; 32];
        out.copy_from_slice(digest.as_ref());
        Ok(out)
    }

    /// The fingerprint in the padded base64 form HPKP pins are written in
    #[cfg(all(feature = "fingerprint", feature = "base64"))]
    pub fn fingerprint_base64(&self) -> Result<String, Error> {
        Ok(data_encoding::BASE64.encode(&self.fingerprint_bytes()?))
    }

    /// Render as an RFC 7468 `PUBLIC KEY` document
    #[cfg(feature = "pem")]
    pub fn to_pem(&self) -> Result<String, Error> {
        Ok(minipki_pem::encode(PEM_LABEL, &self.to_der_vec()?)?)
    }
}

/// Decode a `PUBLIC KEY` PEM document into its DER bytes.
///
/// Returns the owned DER so the caller can parse a borrowing
/// [`SubjectPublicKeyInfoRef`] from it:
///
/// ```ignore
/// let der = from_pem(&text)?;
/// let spki = SubjectPublicKeyInfoRef::from_der_complete(&der)?;
/// ```
#[cfg(feature = "pem")]
pub fn from_pem(text: &str) -> Result<Vec<u8>, Error> {
    let (label, der) = minipki_pem::decode(text)?;
    if label != PEM_LABEL {
        return Err(Error::UnexpectedLabel(PEM_LABEL, label));
    }
    Ok(der)
}

impl Debug for SubjectPublicKeyInfoRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "SubjectPublicKeyInfo({:?}, {} bit key)",
            self.algorithm,
            self.subject_public_key.bit_len()
        )
    }
}

impl ToDer for SubjectPublicKeyInfoRef<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.algorithm.to_der(cursor)?;
            self.subject_public_key.to_der(cursor)
        })
    }
}

impl<'a> FromDer<'a> for SubjectPublicKeyInfoRef<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            Ok(SubjectPublicKeyInfoRef {
                algorithm: AlgorithmIdentifierRef::from_der(inner)?,
                subject_public_key: BitStringRef::from_der(inner)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm;
    use crate::oids;

    // RFC 8032 7.1 test 1 public key wrapped as SubjectPublicKeyInfo
    const ED25519_SPKI: &[u8] = &[
        0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00, 0xd7, 0x5a, 0x98,
        0x01, 0x82, 0xb1, 0x0a, 0xb7, 0xd5, 0x4b, 0xfe, 0xd3, 0xc9, 0x64, 0x07, 0x3a, 0x0e, 0xe1,
        0x72, 0xf3, 0xda, 0xa6, 0x23, 0x25, 0xaf, 0x02, 0x1a, 0x68, 0xf7, 0x07, 0x51, 0x1a,
    ];

    #[test]
    fn parse_ed25519_key() {
        let spki = SubjectPublicKeyInfoRef::from_der_complete(ED25519_SPKI).unwrap();

        assert_eq!(spki.algorithm.oid, oids::ED25519);
        assert!(spki.algorithm.parameters.is_none());

        let key = spki.key_bytes().unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(key[0], 0xd7);
        assert_eq!(spki.subject_public_key.bit_len(), 256);
    }

    #[test]
    fn round_trip_preserves_bytes() {
        let spki = SubjectPublicKeyInfoRef::from_der_complete(ED25519_SPKI).unwrap();
        assert_eq!(spki.der_size(), ED25519_SPKI.len());

        let mut buf = [0u8; 64];
        let mut cursor = EncodeCursor::new(&mut buf);
        spki.to_der(&mut cursor).unwrap();
        let len = cursor.position();
        assert_eq!(&buf[..len], ED25519_SPKI);
    }

    #[test]
    fn construct_ec_key() {
        let key = [0x04u8; 65]; // uncompressed point marker plus x||y
        let spki =
            SubjectPublicKeyInfoRef::new(algorithm::ec_public_key(&oids::PRIME256V1), &key);

        let mut buf = [0u8; 128];
        let mut cursor = EncodeCursor::new(&mut buf);
        spki.to_der(&mut cursor).unwrap();
        let len = cursor.position();

        let decoded = SubjectPublicKeyInfoRef::from_der_complete(&buf[..len]).unwrap();
        assert_eq!(decoded.algorithm.parameters_oid().unwrap(), oids::PRIME256V1);
        assert_eq!(decoded.key_bytes().unwrap(), &key);
    }

    #[test]
    fn trailing_data_rejected() {
        let mut data = [0u8; 45];
        data[..44].copy_from_slice(ED25519_SPKI);
        let result = SubjectPublicKeyInfoRef::from_der_complete(&data);
        assert_eq!(result.unwrap_err(), minipki_der::Error::TrailingData(1));
    }

    #[cfg(feature = "fingerprint")]
    #[test]
    fn fingerprint_is_sha256_of_der() {
        use aws_lc_rs::digest;

        let spki = SubjectPublicKeyInfoRef::from_der_complete(ED25519_SPKI).unwrap();
        let fp = spki.fingerprint_bytes().unwrap();
        let expected = digest::digest(&digest::SHA256, ED25519_SPKI);
        assert_eq!(&fp[..], expected.as_ref());
    }

    #[cfg(all(feature = "fingerprint", feature = "base64"))]
    #[test]
    fn fingerprint_base64_is_padded() {
        let spki = SubjectPublicKeyInfoRef::from_der_complete(ED25519_SPKI).unwrap();
        let b64 = spki.fingerprint_base64().unwrap();
        assert_eq!(b64.len(), 44, "SHA-256 in base64 is 44 chars with padding");
        assert!(b64.ends_with('='));
    }

    #[cfg(feature = "pem")]
    #[test]
    fn pem_round_trip() {
        let spki = SubjectPublicKeyInfoRef::from_der_complete(ED25519_SPKI).unwrap();
        let pem = spki.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));

        let der = from_pem(&pem).unwrap();
        assert_eq!(der, ED25519_SPKI);
    }

    #[cfg(feature = "pem")]
    #[test]
    fn wrong_pem_label_rejected() {
        let pem = minipki_pem::encode("CERTIFICATE", ED25519_SPKI).unwrap();
        match from_pem(&pem).unwrap_err() {
            Error::UnexpectedLabel(expected, got) => {
                assert_eq!(expected, "PUBLIC KEY");
                assert_eq!(got, "CERTIFICATE");
            }
            e => panic!("unexpected error: {e:?}"),
        }
    }
}
