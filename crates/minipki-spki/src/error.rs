use minipki_der::asn1::ObjectIdentifier;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("DER error: {0}")]
    Der(#[from] minipki_der::Error),

    #[error("unexpected algorithm: expected {0}, got {1}")]
    UnexpectedAlgorithm(ObjectIdentifier, ObjectIdentifier),

    #[error("algorithm parameters absent")]
    MissingParameters,

    #[error("algorithm parameters are not an OBJECT IDENTIFIER")]
    ParametersNotAnOid,

    #[cfg(feature = "pem")]
    #[error("PEM error: {0}")]
    Pem(#[from] minipki_pem::Error),

    #[cfg(feature = "pem")]
    #[error("unexpected PEM label: expected {0:?}, got {1:?}")]
    UnexpectedLabel(&'static str, alloc::string::String),
}
