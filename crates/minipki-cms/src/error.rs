use minipki_der::asn1::ObjectIdentifier;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("DER error: {0}")]
    Der(#[from] minipki_der::Error),

    #[error("certificate error: {0}")]
    X509(#[from] minipki_x509::Error),

    #[error("unknown CMS version {0}")]
    UnknownVersion(u64),

    #[error("unexpected content type: expected {0}, got {1}")]
    UnexpectedContentType(ObjectIdentifier, ObjectIdentifier),

    #[error("unsupported CertificateChoices alternative with tag {0:?}")]
    UnsupportedCertificateChoice(minipki_der::Tag),

    #[error("version field is {0:?} but content requires {1:?}")]
    VersionMismatch(crate::content_info::CmsVersion, crate::content_info::CmsVersion),
}
