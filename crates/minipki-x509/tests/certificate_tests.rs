//! End-to-end certificate construction, encoding, and strict-decoding checks.

use minipki_der::asn1::{BitStringRef, DateTime};
use minipki_der::{DecodeCursor, ToDer};
use minipki_spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};
use minipki_spki::oids as spki_oids;
use minipki_x509::certificate::{Certificate, SerialNumber, TbsCertificate, Version};
use minipki_x509::ext::{Extension, Extensions};
use minipki_x509::name::{AttributeTypeAndValue, Name};
use minipki_x509::validity::Validity;
use minipki_x509::{oids, Error};

const KEY: [u8; 32] = [0x42; 32];
const SIGNATURE: [u8; 64] = [0x5a; 64];

fn test_name(cn: &str) -> Name<'_> {
    [AttributeTypeAndValue::utf8(oids::COMMON_NAME, cn)]
        .into_iter()
        .collect()
}

fn test_validity() -> Validity {
    Validity::new(
        DateTime::new(2024, 1, 1, 0, 0, 0).unwrap(),
        DateTime::new(2034, 1, 1, 0, 0, 0).unwrap(),
    )
}

fn test_certificate<'a>(serial: &'a [u8], extensions: Option<Extensions<'a>>) -> Certificate<'a> {
    let version = if extensions.is_some() {
        Version::V3
    } else {
        Version::V1
    };
    let mut tbs = TbsCertificate::new(
        version,
        SerialNumber::new(serial).unwrap(),
        AlgorithmIdentifierRef::new(spki_oids::ED25519),
        test_name("Test Root"),
        test_validity(),
        test_name("leaf.example.org"),
        SubjectPublicKeyInfoRef::new(AlgorithmIdentifierRef::new(spki_oids::ED25519), &KEY),
    );
    tbs.extensions = extensions;

    Certificate {
        tbs_certificate: tbs,
        signature_algorithm: AlgorithmIdentifierRef::new(spki_oids::ED25519),
        signature: BitStringRef::from_bytes(&SIGNATURE),
    }
}

fn ca_extensions() -> Extensions<'static> {
    Extensions::new(vec![Extension::new(
        oids::BASIC_CONSTRAINTS,
        true,
        &[0x30, 0x03, 0x01, 0x01, 0xff],
    )])
    .unwrap()
}

#[test]
fn v3_round_trip() {
    let cert = test_certificate(&[0x01, 0x02, 0x03], Some(ca_extensions()));
    let der = cert.to_der_vec().unwrap();
    assert_eq!(cert.der_size(), der.len());

    let decoded = Certificate::from_der_complete(&der).unwrap();
    assert_eq!(decoded.tbs_certificate.version, Version::V3);
    assert_eq!(decoded.tbs_certificate.serial_number.as_bytes(), &[0x01, 0x02, 0x03]);
    assert_eq!(
        decoded.tbs_certificate.subject.common_name(),
        Some("leaf.example.org")
    );
    assert_eq!(
        decoded.tbs_certificate.issuer.common_name(),
        Some("Test Root")
    );
    assert_eq!(
        decoded
            .tbs_certificate
            .subject_public_key_info
            .key_bytes()
            .unwrap(),
        &KEY
    );
    assert_eq!(decoded.signature.as_key_bytes().unwrap(), &SIGNATURE);

    let exts = decoded.tbs_certificate.extensions.as_ref().unwrap();
    assert!(exts.find(&oids::BASIC_CONSTRAINTS).unwrap().critical);

    // Re-encoding a decoded certificate reproduces the input exactly
    assert_eq!(decoded.to_der_vec().unwrap(), der);
}

#[test]
fn v1_round_trip_omits_version() {
    let cert = test_certificate(&[0x07], None);
    let der = cert.to_der_vec().unwrap();

    // No [0] EXPLICIT version wrapper anywhere in a v1 certificate
    assert!(!der.windows(3).any(|w| w == [0xa0, 0x03, 0x02]));

    let decoded = Certificate::from_der_complete(&der).unwrap();
    assert_eq!(decoded.tbs_certificate.version, Version::V1);
    assert!(decoded.tbs_certificate.extensions.is_none());
}

#[test]
fn tbs_raw_covers_signed_bytes() {
    let cert = test_certificate(&[0x01], Some(ca_extensions()));
    let der = cert.to_der_vec().unwrap();

    let decoded = Certificate::from_der_complete(&der).unwrap();
    let raw = decoded.tbs_raw().expect("decoded certificates carry the span");

    assert_eq!(raw, cert.tbs_certificate.to_der_vec().unwrap());
    assert_eq!(raw[0], 0x30, "span starts at the TBSCertificate tag");

    // A certificate built in memory has no signed span until encoded
    assert!(cert.tbs_raw().is_none());
}

/// Patch the version INTEGER inside the [0] EXPLICIT wrapper
fn patch_version(der: &mut [u8], value: u8) {
    let pos = der
        .windows(5)
        .position(|w| w == [0xa0, 0x03, 0x02, 0x01, 0x02])
        .expect("version wrapper present");
    der[pos + 4] = value;
}

#[test]
fn explicitly_encoded_default_version_rejected() {
    let cert = test_certificate(&[0x01], Some(ca_extensions()));
    let mut der = cert.to_der_vec().unwrap();
    // Keep the structure, downgrade only the version INTEGER to v1.
    // Extensions would also be illegal for v1, but the version check fires
    // first because the field is encoded at its DEFAULT.
    patch_version(&mut der, 0x00);

    assert_eq!(
        Certificate::from_der_complete(&der).unwrap_err(),
        Error::EncodedDefaultValue("version")
    );
}

#[test]
fn extensions_require_v3() {
    let cert = test_certificate(&[0x01], Some(ca_extensions()));
    let mut der = cert.to_der_vec().unwrap();
    patch_version(&mut der, 0x01); // v2

    assert_eq!(
        Certificate::from_der_complete(&der).unwrap_err(),
        Error::UnexpectedField("extensions")
    );
}

#[test]
fn unknown_version_rejected() {
    let cert = test_certificate(&[0x01], Some(ca_extensions()));
    let mut der = cert.to_der_vec().unwrap();
    patch_version(&mut der, 0x05);

    assert_eq!(
        Certificate::from_der_complete(&der).unwrap_err(),
        Error::UnknownVersion(5)
    );
}

#[test]
fn trailing_data_rejected() {
    let cert = test_certificate(&[0x01], None);
    let mut der = cert.to_der_vec().unwrap();
    der.push(0x00);

    assert_eq!(
        Certificate::from_der_complete(&der).unwrap_err(),
        Error::Der(minipki_der::Error::TrailingData(1))
    );
}

#[test]
fn truncation_never_panics() {
    let cert = test_certificate(&[0x01, 0x02, 0x03], Some(ca_extensions()));
    let der = cert.to_der_vec().unwrap();

    for len in 0..der.len() {
        assert!(
            Certificate::from_der_complete(&der[..len]).is_err(),
            "truncation to {len} bytes must fail"
        );
    }
}

#[test]
fn validity_window_checks() {
    let cert = test_certificate(&[0x01], None);
    let der = cert.to_der_vec().unwrap();
    let decoded = Certificate::from_der_complete(&der).unwrap();

    let validity = &decoded.tbs_certificate.validity;
    let mid = DateTime::new(2029, 6, 1, 0, 0, 0).unwrap().unix_secs();
    let early = DateTime::new(2023, 6, 1, 0, 0, 0).unwrap().unix_secs();
    assert!(validity.is_valid_at(mid));
    assert!(!validity.is_valid_at(early));
}

#[test]
fn multiple_certificates_from_one_buffer() {
    let first = test_certificate(&[0x01], None);
    let second = test_certificate(&[0x02], None);

    let mut buffer = first.to_der_vec().unwrap();
    buffer.extend_from_slice(&second.to_der_vec().unwrap());

    let mut cursor = DecodeCursor::new(&buffer);
    let a = Certificate::from_der(&mut cursor).unwrap();
    let b = Certificate::from_der(&mut cursor).unwrap();
    assert!(!cursor.has_remaining());

    assert_eq!(a.tbs_certificate.serial_number.as_bytes(), &[0x01]);
    assert_eq!(b.tbs_certificate.serial_number.as_bytes(), &[0x02]);
}

#[cfg(feature = "pem")]
#[test]
fn pem_round_trip() {
    let cert = test_certificate(&[0x01], Some(ca_extensions()));
    let pem = cert.to_pem().unwrap();
    assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));

    let der = minipki_x509::certificate::from_pem(&pem).unwrap();
    let decoded = Certificate::from_der_complete(&der).unwrap();
    assert_eq!(decoded.tbs_certificate.serial_number.as_bytes(), &[0x01]);
}
