//! Allocation-free ASN.1 DER encoding and decoding for the PKI formats built
//! on top of it (SubjectPublicKeyInfo, X.509 certificates, CMS).
//!
//! Only the DER subset these formats need is implemented: definite minimal
//! lengths, single-octet tag numbers, and strict canonical-form checks so that
//! every value that decodes also re-encodes to the identical bytes.

// The codec uses only safe Rust.
#![forbid(unsafe_code)]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod asn1;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod fields;
pub mod header;
pub mod tag;

// Re-export commonly used types
pub use codec::{FromDer, ToDer};
pub use cursor::{DecodeCursor, EncodeCursor};
pub use error::Error;
pub use header::Header;
pub use tag::{Class, Tag};
