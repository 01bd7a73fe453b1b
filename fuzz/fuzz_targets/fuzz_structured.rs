#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use minipki_der::asn1::{BitStringRef, DateTime};
use minipki_der::ToDer;
use minipki_spki::{oids as spki_oids, AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};
use minipki_x509::certificate::{Certificate, SerialNumber, TbsCertificate, Version};
use minipki_x509::ext::{Extension, Extensions};
use minipki_x509::name::{AttributeTypeAndValue, Name};
use minipki_x509::validity::Validity;
use minipki_x509::oids;

// Arbitrary implementations for structured fuzzing

#[derive(Arbitrary, Debug)]
struct FuzzSerial {
    bytes: [u8; 20],
    len: u8,
}

impl FuzzSerial {
    fn to_serial(&self) -> Option<SerialNumber<'_>> {
        let len = usize::from(self.len) % 20 + 1;
        SerialNumber::new(&self.bytes[..len]).ok()
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzDateTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl FuzzDateTime {
    fn to_date_time(&self) -> DateTime {
        // Constrain into the valid calendar range; day 29-31 may still be
        // invalid for the month, fall back to the 1st
        let year = self.year % 500 + 1950;
        let month = self.month % 12 + 1;
        let day = self.day % 31 + 1;
        DateTime::new(
            year,
            month,
            day,
            self.hour % 24,
            self.minute % 60,
            self.second % 60,
        )
        .or_else(|_| DateTime::new(year, month, 1, 0, 0, 0))
        .expect("constrained date is valid")
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzName {
    common_name: String,
    organization: Option<String>,
}

impl FuzzName {
    fn to_name(&self) -> Name<'_> {
        let mut attrs = vec![AttributeTypeAndValue::utf8(
            oids::COMMON_NAME,
            &self.common_name,
        )];
        if let Some(org) = &self.organization {
            attrs.push(AttributeTypeAndValue::utf8(oids::ORGANIZATION, org));
        }
        attrs.into_iter().collect()
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzExtension {
    critical: bool,
    value: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzCertificate {
    serial: FuzzSerial,
    issuer: FuzzName,
    subject: FuzzName,
    not_before: FuzzDateTime,
    not_after: FuzzDateTime,
    key: [u8; 32],
    signature: [u8; 64],
    extension: Option<FuzzExtension>,
}

impl FuzzCertificate {
    fn to_certificate(&self) -> Option<Certificate<'_>> {
        let extensions = self.extension.as_ref().map(|ext| {
            Extensions::new(vec![Extension::new(
                oids::SUBJECT_ALT_NAME,
                ext.critical,
                &ext.value,
            )])
            .expect("one extension is never empty")
        });

        let mut tbs = TbsCertificate::new(
            if extensions.is_some() {
                Version::V3
            } else {
                Version::V1
            },
            self.serial.to_serial()?,
            AlgorithmIdentifierRef::new(spki_oids::ED25519),
            self.issuer.to_name(),
            Validity::new(self.not_before.to_date_time(), self.not_after.to_date_time()),
            self.subject.to_name(),
            SubjectPublicKeyInfoRef::new(
                AlgorithmIdentifierRef::new(spki_oids::ED25519),
                &self.key,
            ),
        );
        tbs.extensions = extensions;

        Some(Certificate {
            tbs_certificate: tbs,
            signature_algorithm: AlgorithmIdentifierRef::new(spki_oids::ED25519),
            signature: BitStringRef::from_bytes(&self.signature),
        })
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzSpki {
    key: Vec<u8>,
    ec: bool,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    // Anything the library builds must decode back to an equal value
    if let Ok(fuzz_cert) = FuzzCertificate::arbitrary(&mut u) {
        if let Some(cert) = fuzz_cert.to_certificate() {
            let der = cert.to_der_vec().expect("encoding a built certificate");
            assert_eq!(cert.der_size(), der.len());

            let decoded = Certificate::from_der_complete(&der)
                .expect("decoding an encoded certificate");
            assert_eq!(decoded.tbs_certificate.version, cert.tbs_certificate.version);
            assert_eq!(
                decoded.tbs_certificate.serial_number,
                cert.tbs_certificate.serial_number
            );
            assert_eq!(decoded.tbs_certificate.issuer, cert.tbs_certificate.issuer);
            assert_eq!(decoded.to_der_vec().unwrap(), der);
        }
    }

    if let Ok(fuzz_spki) = FuzzSpki::arbitrary(&mut u) {
        let algorithm = if fuzz_spki.ec {
            minipki_spki::algorithm::ec_public_key(&spki_oids::PRIME256V1)
        } else {
            AlgorithmIdentifierRef::new(spki_oids::ED25519)
        };
        let spki = SubjectPublicKeyInfoRef::new(algorithm, &fuzz_spki.key);

        let der = spki.to_der_vec().expect("encoding a built key");
        let decoded =
            SubjectPublicKeyInfoRef::from_der_complete(&der).expect("decoding an encoded key");
        assert_eq!(decoded, spki);
        assert_eq!(decoded.key_bytes().unwrap(), &fuzz_spki.key[..]);
    }
});
