//! X.509 `SubjectPublicKeyInfo` and `AlgorithmIdentifier` as borrowing DER
//! types (RFC 5280 4.1).
//!
//! Decoded structures reference the input buffer rather than copying out of
//! it, so the core works without an allocator. The optional features layer
//! on hosted conveniences:
//!
//! * `fingerprint`: SHA-256 key fingerprints for pinning
//! * `base64`: fingerprints in the padded base64 form pins are published in
//! * `pem`: RFC 7468 `PUBLIC KEY` documents

// This crate uses only safe Rust.
#![forbid(unsafe_code)]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod algorithm;
pub mod error;
pub mod oids;
pub mod spki;

pub use algorithm::AlgorithmIdentifierRef;
pub use error::Error;
pub use spki::SubjectPublicKeyInfoRef;
