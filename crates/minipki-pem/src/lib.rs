//! RFC 7468 PEM textual envelope: base64-wrapped DER between BEGIN/END
//! boundary lines.
//!
//! Only the strict subset needed for PKI interchange is implemented: one
//! document per envelope, 64-column base64 body, matching labels. Text
//! before the BEGIN line and after the END line is ignored, which is how
//! certificate bundles with human-readable headers are usually shipped.

// This crate uses only safe Rust.
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::string::String;
use alloc::vec::Vec;

use data_encoding::BASE64;
use thiserror::Error;

/// RFC 7468 2: generators MUST wrap the base64 text to 64 characters
pub const LINE_WIDTH: usize = 64;

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const BOUNDARY_TAIL: &str = "-----";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("no BEGIN boundary line found")]
    MissingBegin,

    #[error("no END boundary line found")]
    MissingEnd,

    #[error("label mismatch: BEGIN {0:?}, END {1:?}")]
    MismatchedLabel(String, String),

    #[error("label {0:?} is not a valid PEM label")]
    InvalidLabel(String),

    #[error("base64 decode failed at position {0}")]
    Base64(usize),
}

/// RFC 7468 3: labels are printable ASCII minus the boundary marker itself.
/// Leading/trailing spaces or hyphens are not allowed.
pub fn validate_label(label: &str) -> Result<(), Error> {
    let invalid = label.is_empty()
        || label.starts_with([' ', '-'])
        || label.ends_with([' ', '-'])
        || label.contains(BOUNDARY_TAIL)
        || !label.bytes().all(|b| (0x20..=0x7e).contains(&b));

    if invalid {
        return Err(Error::InvalidLabel(String::from(label)));
    }
    Ok(())
}

/// Encode `der` under the given label, e.g. `CERTIFICATE` or `PUBLIC KEY`
pub fn encode(label: &str, der: &[u8]) -> Result<String, Error> {
    validate_label(label)?;

    let body = BASE64.encode(der);
    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 2 * (label.len() + 32));

    out.push_str(BEGIN);
    out.push_str(label);
    out.push_str(BOUNDARY_TAIL);
    out.push('\n');
    for chunk in body.as_bytes().chunks(LINE_WIDTH) {
        out.push_str(core::str::from_utf8(chunk).expect("base64 output is ASCII"));
        out.push('\n');
    }
    out.push_str(END);
    out.push_str(label);
    out.push_str(BOUNDARY_TAIL);
    out.push('\n');
    Ok(out)
}

/// Decode the first PEM envelope in `text`, returning its label and DER bytes
pub fn decode(text: &str) -> Result<(String, Vec<u8>), Error> {
    let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

    let begin_label = loop {
        let line = lines.next().ok_or(Error::MissingBegin)?;
        if let Some(label) = parse_boundary(line, BEGIN) {
            break label;
        }
    };
    validate_label(begin_label)?;

    let mut body = String::new();
    let end_label = loop {
        let line = lines.next().ok_or(Error::MissingEnd)?;
        if let Some(label) = parse_boundary(line, END) {
            break label;
        }
        body.push_str(line.trim());
    };

    if begin_label != end_label {
        return Err(Error::MismatchedLabel(
            String::from(begin_label),
            String::from(end_label),
        ));
    }

    let der = BASE64
        .decode(body.as_bytes())
        .map_err(|e| Error::Base64(e.position))?;
    Ok((String::from(begin_label), der))
}

/// Return the label of the first envelope without decoding its body
pub fn decode_label(text: &str) -> Result<&str, Error> {
    for line in text.lines() {
        if let Some(label) = parse_boundary(line.trim_end_matches('\r'), BEGIN) {
            validate_label(label)?;
            return Ok(label);
        }
    }
    Err(Error::MissingBegin)
}

fn parse_boundary<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.strip_prefix(marker)?.strip_suffix(BOUNDARY_TAIL)
}
