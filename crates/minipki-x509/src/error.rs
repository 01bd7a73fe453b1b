use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("DER error: {0}")]
    Der(#[from] minipki_der::Error),

    #[error("SPKI error: {0}")]
    Spki(#[from] minipki_spki::Error),

    #[error("serial number is {0} bytes; 1 to 20 allowed")]
    InvalidSerialNumber(usize),

    #[error("unknown certificate version {0}")]
    UnknownVersion(u64),

    #[error("field {0} not allowed for this certificate version")]
    UnexpectedField(&'static str),

    #[error("DEFAULT value for {0} was encoded explicitly")]
    EncodedDefaultValue(&'static str),

    #[error("extension list is empty")]
    EmptyExtensions,

    #[cfg(feature = "pem")]
    #[error("PEM error: {0}")]
    Pem(#[from] minipki_pem::Error),

    #[cfg(feature = "pem")]
    #[error("unexpected PEM label: expected {0:?}, got {1:?}")]
    UnexpectedLabel(&'static str, alloc::string::String),
}
