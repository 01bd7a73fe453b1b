#![no_main]

use libfuzzer_sys::fuzz_target;
use minipki_cms::ContentInfo;
use minipki_cms::signed_data::SignedData;
use minipki_der::{DecodeCursor, FromDer, ToDer};
use minipki_spki::SubjectPublicKeyInfoRef;
use minipki_x509::certificate::Certificate;

fuzz_target!(|data: &[u8]| {
    // Accepted inputs must re-encode to the identical bytes
    if let Ok(cert) = Certificate::from_der_complete(data) {
        assert_eq!(cert.der_size(), data.len());
        assert_eq!(cert.to_der_vec().unwrap(), data);

        // The captured signed span sits inside the input
        let raw = cert.tbs_raw().expect("decoded certificate has a span");
        assert!(raw.len() <= data.len());
    }

    if let Ok(spki) = SubjectPublicKeyInfoRef::from_der_complete(data) {
        assert_eq!(spki.to_der_vec().unwrap(), data);
    }

    if let Ok(info) = ContentInfo::from_der_complete(data) {
        assert_eq!(info.to_der_vec().unwrap(), data);
        let _ = info.signed_data();
    }

    let mut cursor = DecodeCursor::new(data);
    if let Ok(signed_data) = SignedData::from_der(&mut cursor) {
        let der = signed_data.to_der_vec().unwrap();
        assert_eq!(&der[..], &data[..cursor.position()]);
    }
});
