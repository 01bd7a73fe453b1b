//! X.509 v3 certificates over borrowed DER (RFC 5280).
//!
//! Certificates decode into structures that reference the input buffer, and
//! the exact signed span of the `TBSCertificate` is retained so signatures
//! can be verified over the bytes that were actually signed. Decoding is
//! strict DER: BER length forms, non-canonical values, and fields encoded at
//! their DEFAULT are all rejected.

// This crate uses only safe Rust.
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod certificate;
pub mod error;
pub mod ext;
pub mod name;
pub mod oids;
pub mod validity;

pub use certificate::{Certificate, SerialNumber, TbsCertificate, Version};
pub use error::Error;
pub use ext::{Extension, Extensions};
pub use name::{AttributeTypeAndValue, Name, RelativeDistinguishedName};
pub use validity::{Time, Validity};
