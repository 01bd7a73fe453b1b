//! Attribute and extension identifiers a certificate parser meets constantly

use minipki_der::asn1::ObjectIdentifier;

/// id-at-commonName: 2.5.4.3
pub const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x04, 0x03]);

/// id-at-countryName: 2.5.4.6
pub const COUNTRY: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x04, 0x06]);

/// id-at-localityName: 2.5.4.7
pub const LOCALITY: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x04, 0x07]);

/// id-at-stateOrProvinceName: 2.5.4.8
pub const STATE_OR_PROVINCE: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x04, 0x08]);

/// id-at-organizationName: 2.5.4.10
pub const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x04, 0x0a]);

/// id-at-organizationalUnitName: 2.5.4.11
pub const ORGANIZATIONAL_UNIT: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x04, 0x0b]);

/// pkcs-9 emailAddress: 1.2.840.113549.1.9.1
pub const EMAIL_ADDRESS: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x01]);

/// id-ce-subjectKeyIdentifier: 2.5.29.14
pub const SUBJECT_KEY_IDENTIFIER: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x55, 0x1d, 0x0e]);

/// id-ce-keyUsage: 2.5.29.15
pub const KEY_USAGE: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x1d, 0x0f]);

/// id-ce-subjectAltName: 2.5.29.17
pub const SUBJECT_ALT_NAME: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x1d, 0x11]);

/// id-ce-basicConstraints: 2.5.29.19
pub const BASIC_CONSTRAINTS: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x1d, 0x13]);

/// id-ce-authorityKeyIdentifier: 2.5.29.35
pub const AUTHORITY_KEY_IDENTIFIER: ObjectIdentifier =
    ObjectIdentifier::from_raw(&[0x55, 0x1d, 0x23]);

/// id-ce-extKeyUsage: 2.5.29.37
pub const EXT_KEY_USAGE: ObjectIdentifier = ObjectIdentifier::from_raw(&[0x55, 0x1d, 0x25]);

/// Short attribute name for RFC 4514 string form, if one is registered
pub(crate) fn attribute_short_name(oid: &ObjectIdentifier) -> Option<&'static str> {
    let name = if *oid == COMMON_NAME {
        "CN"
    } else if *oid == COUNTRY {
        "C"
    } else if *oid == LOCALITY {
        "L"
    } else if *oid == STATE_OR_PROVINCE {
        "ST"
    } else if *oid == ORGANIZATION {
        "O"
    } else if *oid == ORGANIZATIONAL_UNIT {
        "OU"
    } else if *oid == EMAIL_ADDRESS {
        "emailAddress"
    } else {
        return None;
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_forms_match() {
        for (oid, dotted) in [
            (COMMON_NAME, "2.5.4.3"),
            (COUNTRY, "2.5.4.6"),
            (LOCALITY, "2.5.4.7"),
            (STATE_OR_PROVINCE, "2.5.4.8"),
            (ORGANIZATION, "2.5.4.10"),
            (ORGANIZATIONAL_UNIT, "2.5.4.11"),
            (EMAIL_ADDRESS, "1.2.840.113549.1.9.1"),
            (SUBJECT_KEY_IDENTIFIER, "2.5.29.14"),
            (KEY_USAGE, "2.5.29.15"),
            (SUBJECT_ALT_NAME, "2.5.29.17"),
            (BASIC_CONSTRAINTS, "2.5.29.19"),
            (AUTHORITY_KEY_IDENTIFIER, "2.5.29.35"),
            (EXT_KEY_USAGE, "2.5.29.37"),
        ] {
            assert_eq!(
                oid,
                ObjectIdentifier::new(dotted).unwrap(),
                "constant for {dotted} does not match its dotted form"
            );
        }
    }
}
