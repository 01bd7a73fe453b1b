//! Well-known algorithm identifiers. Raw DER content octets with the dotted
//! form alongside, validated at compile time by `from_raw`.

use minipki_der::asn1::ObjectIdentifier;

/// rsaEncryption: 1.2.840.113549.1.1.1
pub const RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01]);

/// sha256WithRSAEncryption: 1.2.840.113549.1.1.11
pub const SHA256_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b]);

/// sha384WithRSAEncryption: 1.2.840.113549.1.1.12
pub const SHA384_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0c]);

/// id-ecPublicKey: 1.2.840.10045.2.1
pub const EC_PUBLIC_KEY: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01]);

/// ecdsa-with-SHA256: 1.2.840.10045.4.3.2
pub const ECDSA_WITH_SHA256: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02]);

/// ecdsa-with-SHA384: 1.2.840.10045.4.3.3
pub const ECDSA_WITH_SHA384: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x03]);

/// prime256v1 (secp256r1): 1.2.840.10045.3.1.7
pub const PRIME256V1: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07]);

/// secp384r1: 1.3.132.0.34
pub const SECP384R1: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2b, 0x81, 0x04, 0x00, 0x22]);

/// id-Ed25519: 1.3.101.112
pub const ED25519: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x2b, 0x65, 0x70]);

/// id-X25519: 1.3.101.110
pub const X25519: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x2b, 0x65, 0x6e]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_forms_match() {
        for (oid, dotted) in [
            (RSA_ENCRYPTION, "1.2.840.113549.1.1.1"),
            (SHA256_WITH_RSA, "1.2.840.113549.1.1.11"),
            (SHA384_WITH_RSA, "1.2.840.113549.1.1.12"),
            (EC_PUBLIC_KEY, "1.2.840.10045.2.1"),
            (ECDSA_WITH_SHA256, "1.2.840.10045.4.3.2"),
            (ECDSA_WITH_SHA384, "1.2.840.10045.4.3.3"),
            (PRIME256V1, "1.2.840.10045.3.1.7"),
            (SECP384R1, "1.3.132.0.34"),
            (ED25519, "1.3.101.112"),
            (X25519, "1.3.101.110"),
        ] {
            assert_eq!(
                oid,
                ObjectIdentifier::new(dotted).unwrap(),
                "constant for {dotted} does not match its dotted form"
            );
        }
    }
}
