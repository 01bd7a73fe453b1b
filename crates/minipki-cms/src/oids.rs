//! Content-type and attribute identifiers from RFC 5652 and friends

use minipki_der::asn1::ObjectIdentifier;

/// id-data: 1.2.840.113549.1.7.1
pub const ID_DATA: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01]);

/// id-signedData: 1.2.840.113549.1.7.2
pub const ID_SIGNED_DATA: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x02]);

/// id-contentType: 1.2.840.113549.1.9.3
pub const CONTENT_TYPE: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x03]);

/// id-messageDigest: 1.2.840.113549.1.9.4
pub const MESSAGE_DIGEST: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x04]);

/// id-signingTime: 1.2.840.113549.1.9.5
pub const SIGNING_TIME: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x05]);

/// id-sha256: 2.16.840.1.101.3.4.2.1
pub const SHA256: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01]);
