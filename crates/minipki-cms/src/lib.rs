//! Cryptographic Message Syntax `SignedData` (RFC 5652) over borrowed DER.
//!
//! Only the SignedData content type is implemented; enveloped, digested, and
//! encrypted data are out of scope. Decoding enforces the RFC 5652 version
//! selection rules, and decoded structures re-encode byte for byte.

// This crate uses only safe Rust.
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod content_info;
pub mod error;
pub mod oids;
pub mod signed_data;

pub use content_info::{CmsVersion, ContentInfo};
pub use error::Error;
pub use signed_data::{
    Attribute, EncapsulatedContentInfo, IssuerAndSerialNumber, SignedData, SignerIdentifier,
    SignerInfo,
};
