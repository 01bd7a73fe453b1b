#![no_main]

use libfuzzer_sys::fuzz_target;
use minipki_der::asn1::{
    AnyRef, BitStringRef, GeneralizedTime, Ia5StringRef, IntRef, ObjectIdentifier, OctetStringRef,
    PrintableStringRef, UintRef, UtcTime, Utf8StringRef,
};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Header, ToDer};

// Every decoder must either reject arbitrary bytes with an error or produce
// a value that re-encodes to exactly the bytes it consumed.
fn check_round_trip<'a, T>(data: &'a [u8])
where
    T: FromDer<'a> + ToDer,
{
    let mut cursor = DecodeCursor::new(data);
    let Ok(value) = T::from_der(&mut cursor) else {
        return;
    };
    let consumed = cursor.position();
    assert_eq!(value.der_size(), consumed, "der_size disagrees with decode");

    let mut buffer = vec![0u8; consumed];
    let mut out = EncodeCursor::new(&mut buffer);
    value.to_der(&mut out).expect("re-encoding a decoded value");
    assert_eq!(&buffer[..], &data[..consumed], "round-trip changed bytes");
}

fuzz_target!(|data: &[u8]| {
    let _ = Header::decode(&mut DecodeCursor::new(data));

    check_round_trip::<AnyRef>(data);
    check_round_trip::<bool>(data);
    check_round_trip::<u64>(data);
    check_round_trip::<IntRef>(data);
    check_round_trip::<UintRef>(data);
    check_round_trip::<OctetStringRef>(data);
    check_round_trip::<BitStringRef>(data);
    check_round_trip::<Utf8StringRef>(data);
    check_round_trip::<PrintableStringRef>(data);
    check_round_trip::<Ia5StringRef>(data);
    check_round_trip::<UtcTime>(data);
    check_round_trip::<GeneralizedTime>(data);

    // OIDs additionally round-trip through their dotted text form
    if let Ok(oid) = ObjectIdentifier::from_der(&mut DecodeCursor::new(data)) {
        let dotted = oid.to_string();
        let back = ObjectIdentifier::new(&dotted).expect("dotted form reparses");
        assert_eq!(back, oid, "dotted form changed the OID");
    }

    // Hex decoding either inverts encoding or reports an in-range defect
    match minipki_hex::decode_vec(data) {
        Ok(bytes) => {
            assert_eq!(bytes.len() * 2, data.len());
            let lower = minipki_hex::encode_lower_string(&bytes);
            assert_eq!(
                minipki_hex::decode_vec(lower.as_bytes()).expect("hex output reparses"),
                bytes
            );
        }
        Err(minipki_hex::Error::OddLength(n)) => assert_eq!(n, data.len()),
        Err(minipki_hex::Error::InvalidCharacter(position)) => {
            assert!(position < data.len(), "reported position out of range");
            assert!(
                !data[position].is_ascii_hexdigit(),
                "reported position holds a valid digit"
            );
        }
        Err(e) => panic!("unexpected error: {e:?}"),
    }
});
