use core::fmt::Debug;

use minipki_der::asn1::{AnyRef, ObjectIdentifier};
use minipki_der::fields::{framed_size, read_sequence, write_sequence};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Tag, ToDer};

use crate::error::Error;

/// RFC 5280 4.1.1.2: an algorithm OID plus algorithm-defined parameters.
///
/// ```text
///   AlgorithmIdentifier ::= SEQUENCE {
///        algorithm   OBJECT IDENTIFIER,
///        parameters  ANY DEFINED BY algorithm OPTIONAL }
/// ```
///
/// Parameters are captured uninterpreted: RSA carries an explicit NULL,
/// ECDSA carries the named-curve OID, and the modern EdDSA algorithms omit
/// the field entirely.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmIdentifierRef<'a> {
    pub oid: ObjectIdentifier,
    pub parameters: Option<AnyRef<'a>>,
}

impl<'a> AlgorithmIdentifierRef<'a> {
    /// An identifier with no parameters field (Ed25519, X25519)
    pub fn new(oid: ObjectIdentifier) -> Self {
        Self {
            oid,
            parameters: None,
        }
    }

    /// Return `Ok(())` when this identifier names `expected`
    pub fn assert_algorithm_oid(&self, expected: ObjectIdentifier) -> Result<(), Error> {
        if self.oid == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedAlgorithm(expected, self.oid))
        }
    }

    /// The parameters interpreted as an OID, the way ECDSA names its curve
    pub fn parameters_oid(&self) -> Result<ObjectIdentifier, Error> {
        let any = self.parameters.ok_or(Error::MissingParameters)?;
        if any.tag() != Tag::OBJECT_IDENTIFIER {
            return Err(Error::ParametersNotAnOid);
        }
        Ok(ObjectIdentifier::from_bytes(any.value())?)
    }

    /// True when the parameters field is an explicit NULL, RSA style
    pub fn parameters_are_null(&self) -> bool {
        matches!(self.parameters, Some(any) if any.tag() == Tag::NULL && any.value().is_empty())
    }

    fn value_size(&self) -> usize {
        self.oid.der_size() + self.parameters.map_or(0, |p| p.der_size())
    }
}

impl Debug for AlgorithmIdentifierRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.parameters {
            Some(params) => write!(f, "AlgorithmIdentifier({}, {params:?})", self.oid),
            None => write!(f, "AlgorithmIdentifier({})", self.oid),
        }
    }
}

impl ToDer for AlgorithmIdentifierRef<'_> {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.oid.to_der(cursor)?;
            if let Some(params) = &self.parameters {
                params.to_der(cursor)?;
            }
            Ok(())
        })
    }
}

impl<'a> FromDer<'a> for AlgorithmIdentifierRef<'a> {
    fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            let oid = ObjectIdentifier::from_der(inner)?;
            let parameters = if inner.has_remaining() {
                Some(AnyRef::from_der(inner)?)
            } else {
                None
            };
            Ok(AlgorithmIdentifierRef { oid, parameters })
        })
    }
}

/// Convenience constructor for RSA's `NULL` parameters convention
pub fn rsa_encryption<'a>() -> AlgorithmIdentifierRef<'a> {
    // The NULL TLV is 05 00
    AlgorithmIdentifierRef {
        oid: crate::oids::RSA_ENCRYPTION,
        parameters: Some(AnyRef::new(Tag::NULL, &[])),
    }
}

/// Convenience constructor for an ECDSA key on the named curve
pub fn ec_public_key(curve: &ObjectIdentifier) -> AlgorithmIdentifierRef<'_> {
    // The curve OID rides in the parameters slot as its content octets
    AlgorithmIdentifierRef {
        oid: crate::oids::EC_PUBLIC_KEY,
        parameters: Some(AnyRef::new(Tag::OBJECT_IDENTIFIER, curve.as_bytes())),
    }
}
