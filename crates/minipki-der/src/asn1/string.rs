//! The restricted-character string types PKI structures actually use:
//! UTF8String, PrintableString, and IA5String.

use core::fmt::{self, Debug};

use pastey::paste;

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

fn check_utf8(bytes: &[u8]) -> Result<&str, Error> {
    core::str::from_utf8(bytes).map_err(|e| {
        let at = e.valid_up_to().min(bytes.len().saturating_sub(1));
        Error::InvalidCharacter(bytes[at])
    })
}

/// X.680 41.4: PrintableString is A-Z a-z 0-9 space ' ( ) + , - . / : = ?
fn check_printable(bytes: &[u8]) -> Result<&str, Error> {
    for &b in bytes {
        let ok = b.is_ascii_alphanumeric()
            || matches!(
                b,
                b' ' | b'\'' | b'(' | b')' | b'+' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?'
            );
        if !ok {
            return Err(Error::InvalidCharacter(b));
        }
    }
    // all-ASCII by construction
    Ok(core::str::from_utf8(bytes).expect("printable strings are ASCII"))
}

/// IA5String is the full 7-bit ASCII range
fn check_ia5(bytes: &[u8]) -> Result<&str, Error> {
    for &b in bytes {
        if !b.is_ascii() {
            return Err(Error::InvalidCharacter(b));
        }
    }
    Ok(core::str::from_utf8(bytes).expect("IA5 strings are ASCII"))
}

// The three types are identical apart from tag and charset check, so generate
// them from one template.
macro_rules! make_string_type {
    ( $name:ident, $tag:ident, $check:path, $desc:literal ) => {
        paste! {
            #[doc = "A borrowed " $desc " with its character set validated on"]
            #[doc = " construction and on decode."]
            #[derive(Clone, Copy, PartialEq, Eq)]
            pub struct [<$name StringRef>]<'a> {
                inner: &'a str,
            }

            impl<'a> [<$name StringRef>]<'a> {
                pub fn new(s: &'a str) -> Result<Self, Error> {
                    $check(s.as_bytes())?;
                    Ok(Self { inner: s })
                }

                pub fn as_str(&self) -> &'a str {
                    self.inner
                }

                pub fn len(&self) -> usize {
                    self.inner.len()
                }

                pub fn is_empty(&self) -> bool {
                    self.inner.is_empty()
                }
            }

            impl Debug for [<$name StringRef>]<'_> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}({:?})", $desc, self.inner)
                }
            }

            impl AsRef<str> for [<$name StringRef>]<'_> {
                fn as_ref(&self) -> &str {
                    self.inner
                }
            }

            impl ToDer for [<$name StringRef>]<'_> {
                fn der_size(&self) -> usize {
                    Header::encoded_size(self.inner.len() as u32) + self.inner.len()
                }

                fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
                    Header::new(Tag::$tag, self.inner.len() as u32).encode(cursor)?;
                    cursor.try_put_slice(self.inner.as_bytes())
                }
            }

            impl<'a> FromDer<'a> for [<$name StringRef>]<'a> {
                fn from_der(cursor: &mut DecodeCursor<'a>) -> Result<Self, Error> {
                    let header = Header::decode_expecting(cursor, Tag::$tag)?;
                    let bytes = cursor.try_get_slice(header.length as usize)?;
                    Ok(Self { inner: $check(bytes)? })
                }
            }
        }
    };
}

make_string_type!(Utf8, UTF8_STRING, check_utf8, "UTF8String");
make_string_type!(Printable, PRINTABLE_STRING, check_printable, "PrintableString");
make_string_type!(Ia5, IA5_STRING, check_ia5, "IA5String");
