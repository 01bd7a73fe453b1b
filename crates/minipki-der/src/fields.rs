//! Helpers for composite values: SEQUENCE/SET framing and the context-specific
//! `[n]` field wrappers (EXPLICIT and IMPLICIT) that X.509 and CMS lean on.

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

/// Complete TLV size of a constructed value whose content is `value_size` bytes
pub const fn framed_size(value_size: usize) -> usize {
    Header::encoded_size(value_size as u32) + value_size
}

/// Decode a SEQUENCE, handing its content to `f`. The closure must consume the
/// content exactly; leftover bytes are `TrailingData`.
pub fn read_sequence<'a, T, F>(cursor: &mut DecodeCursor<'a>, f: F) -> Result<T, Error>
where
    F: FnOnce(&mut DecodeCursor<'a>) -> Result<T, Error>,
{
    read_constructed(cursor, Tag::SEQUENCE, f)
}

/// Decode a SET, handing its content to `f`
pub fn read_set<'a, T, F>(cursor: &mut DecodeCursor<'a>, f: F) -> Result<T, Error>
where
    F: FnOnce(&mut DecodeCursor<'a>) -> Result<T, Error>,
{
    read_constructed(cursor, Tag::SET, f)
}

fn read_constructed<'a, T, F>(cursor: &mut DecodeCursor<'a>, tag: Tag, f: F) -> Result<T, Error>
where
    F: FnOnce(&mut DecodeCursor<'a>) -> Result<T, Error>,
{
    let header = Header::decode_expecting(cursor, tag)?;
    let mut inner = cursor.read_nested(header.length as usize)?;
    let value = f(&mut inner)?;
    if inner.has_remaining() {
        return Err(Error::TrailingData(inner.remaining()));
    }
    Ok(value)
}

/// Encode a SEQUENCE whose content is `value_size` bytes written by `f`
pub fn write_sequence<F>(cursor: &mut EncodeCursor<'_>, value_size: usize, f: F) -> Result<(), Error>
where
    F: FnOnce(&mut EncodeCursor<'_>) -> Result<(), Error>,
{
    write_constructed(cursor, Tag::SEQUENCE, value_size, f)
}

/// Encode a SET whose content is `value_size` bytes written by `f`
pub fn write_set<F>(cursor: &mut EncodeCursor<'_>, value_size: usize, f: F) -> Result<(), Error>
where
    F: FnOnce(&mut EncodeCursor<'_>) -> Result<(), Error>,
{
    write_constructed(cursor, Tag::SET, value_size, f)
}

pub fn write_constructed<F>(
    cursor: &mut EncodeCursor<'_>,
    tag: Tag,
    value_size: usize,
    f: F,
) -> Result<(), Error>
where
    F: FnOnce(&mut EncodeCursor<'_>) -> Result<(), Error>,
{
    Header::new(tag, value_size as u32).encode(cursor)?;
    f(cursor)
}

/// Returns true when the next TLV carries the context-specific tag `[n]`.
/// Absent fields (end of content, or some other tag) return false so OPTIONAL
/// members can be skipped without consuming anything.
pub fn peek_context_specific(cursor: &DecodeCursor<'_>, number: u8) -> bool {
    match Header::peek(cursor) {
        Ok(header) => header.tag.is_context_specific(number),
        Err(_) => false,
    }
}

/// Decode an OPTIONAL `[n] EXPLICIT` field: a constructed context-specific
/// wrapper containing exactly one inner TLV.
pub fn read_explicit<'a, T: FromDer<'a>>(
    cursor: &mut DecodeCursor<'a>,
    number: u8,
) -> Result<Option<T>, Error> {
    if !peek_context_specific(cursor, number) {
        return Ok(None);
    }

    let expected = Tag::context_specific(number, true);
    let header = Header::decode_expecting(cursor, expected)?;
    let mut inner = cursor.read_nested(header.length as usize)?;
    let value = T::from_der(&mut inner)?;
    if inner.has_remaining() {
        return Err(Error::TrailingData(inner.remaining()));
    }
    Ok(Some(value))
}

/// Complete size of a `[n] EXPLICIT` wrapper around a value of `inner_size`
/// total bytes
pub const fn explicit_size(inner_size: usize) -> usize {
    framed_size(inner_size)
}

/// Encode a `[n] EXPLICIT` wrapper around `value`
pub fn write_explicit<T: ToDer>(
    cursor: &mut EncodeCursor<'_>,
    number: u8,
    value: &T,
) -> Result<(), Error> {
    let tag = Tag::context_specific(number, true);
    Header::new(tag, value.der_size() as u32).encode(cursor)?;
    value.to_der(cursor)
}

/// Decode an OPTIONAL `[n] IMPLICIT` field. The wrapper replaces the inner
/// value's own tag, so the caller's closure receives the bare content and must
/// know what it means. `constructed` selects the form of the context tag.
pub fn read_implicit<'a, T, F>(
    cursor: &mut DecodeCursor<'a>,
    number: u8,
    constructed: bool,
    f: F,
) -> Result<Option<T>, Error>
where
    F: FnOnce(&mut DecodeCursor<'a>) -> Result<T, Error>,
{
    if !peek_context_specific(cursor, number) {
        return Ok(None);
    }

    let expected = Tag::context_specific(number, constructed);
    let header = Header::decode_expecting(cursor, expected)?;
    let mut inner = cursor.read_nested(header.length as usize)?;
    let value = f(&mut inner)?;
    if inner.has_remaining() {
        return Err(Error::TrailingData(inner.remaining()));
    }
    Ok(Some(value))
}

/// Encode a `[n] IMPLICIT` wrapper whose content is `value_size` bytes written
/// by `f`
pub fn write_implicit<F>(
    cursor: &mut EncodeCursor<'_>,
    number: u8,
    constructed: bool,
    value_size: usize,
    f: F,
) -> Result<(), Error>
where
    F: FnOnce(&mut EncodeCursor<'_>) -> Result<(), Error>,
{
    let tag = Tag::context_specific(number, constructed);
    Header::new(tag, value_size as u32).encode(cursor)?;
    f(cursor)
}
