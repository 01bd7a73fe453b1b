use Error::{BufferTooSmall, NestingTooDeep};

use crate::error::Error;

/// Decoders give up once TLVs are nested this deep. The PKI structures this
/// workspace handles stay in single digits; anything deeper is hostile input.
pub const MAX_DEPTH: u8 = 32;

/// A read-only cursor over a DER-encoded buffer.
///
/// Slices handed out borrow from the underlying buffer for its full lifetime,
/// so decoded values can hold `&'a [u8]` views without copying.
#[derive(Clone)]
pub struct DecodeCursor<'a> {
    data: &'a [u8],
    position: usize,
    depth: u8,
}

impl<'a> DecodeCursor<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            depth: 0,
        }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.position < self.data.len()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Read a single byte without advancing the cursor
    #[inline]
    pub fn peek_u8(&self) -> Result<u8, Error> {
        if !self.has_remaining() {
            return Err(BufferTooSmall(1, 0));
        }
        Ok(self.data[self.position])
    }

    /// Read a single byte, advancing the cursor
    #[inline]
    pub fn try_get_u8(&mut self) -> Result<u8, Error> {
        if !self.has_remaining() {
            return Err(BufferTooSmall(1, 0));
        }
        let value = self.data[self.position];
        self.position += 1;
        Ok(value)
    }

    /// Borrow the next `n` bytes, advancing the cursor
    #[inline]
    pub fn try_get_slice(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(BufferTooSmall(n, self.remaining()));
        }
        let slice = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// Advance the cursor by `n` bytes
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<(), Error> {
        if self.remaining() < n {
            return Err(BufferTooSmall(n, self.remaining()));
        }
        self.position += n;
        Ok(())
    }

    /// Borrow the bytes consumed since `mark` (an earlier `position()` value).
    ///
    /// Used to capture the exact encoding of a value that was just decoded,
    /// e.g. the raw TBSCertificate bytes needed for signature verification.
    #[inline]
    pub fn span(&self, mark: usize) -> &'a [u8] {
        &self.data[mark..self.position]
    }

    /// Split off a child cursor over the next `len` bytes, advancing this
    /// cursor past them. The child tracks nesting depth so pathologically
    /// nested input is rejected rather than walked.
    pub fn read_nested(&mut self, len: usize) -> Result<DecodeCursor<'a>, Error> {
        if self.depth >= MAX_DEPTH {
            return Err(NestingTooDeep(self.depth));
        }
        let body = self.try_get_slice(len)?;
        Ok(DecodeCursor {
            data: body,
            position: 0,
            depth: self.depth + 1,
        })
    }
}

/// A write cursor over a caller-provided output buffer. No allocation occurs;
/// the caller sizes the buffer using `ToDer::der_size`.
pub struct EncodeCursor<'a> {
    data: &'a mut [u8],
    position: usize,
}

impl<'a> EncodeCursor<'a> {
    #[inline]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Write a single byte, advancing the cursor
    #[inline]
    pub fn try_put_u8(&mut self, value: u8) -> Result<(), Error> {
        if self.remaining() < 1 {
            return Err(BufferTooSmall(1, 0));
        }
        self.data[self.position] = value;
        self.position += 1;
        Ok(())
    }

    /// Transfer bytes from `src` into `self`, advancing the cursor by the
    /// number of bytes written.
    #[inline]
    pub fn try_put_slice(&mut self, src: &[u8]) -> Result<(), Error> {
        if self.remaining() < src.len() {
            return Err(BufferTooSmall(src.len(), self.remaining()));
        }
        self.data[self.position..self.position + src.len()].copy_from_slice(src);
        self.position += src.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_cursor_bounds() {
        let data = [0x01, 0x02];
        let mut cursor = DecodeCursor::new(&data);

        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.try_get_u8().unwrap(), 0x01);
        assert_eq!(cursor.try_get_slice(1).unwrap(), &[0x02]);
        assert!(!cursor.has_remaining());
        assert!(matches!(cursor.try_get_u8(), Err(BufferTooSmall(1, 0))));
    }

    #[test]
    fn peek_does_not_advance() {
        let data = [0xab];
        let cursor = DecodeCursor::new(&data);

        assert_eq!(cursor.peek_u8().unwrap(), 0xab);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn span_captures_consumed_bytes() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut cursor = DecodeCursor::new(&data);

        cursor.advance(1).unwrap();
        let mark = cursor.position();
        cursor.advance(2).unwrap();

        assert_eq!(cursor.span(mark), &[0x02, 0x03]);
    }

    #[test]
    fn nesting_limit_enforced() {
        // 33 SEQUENCE headers wrapped around a NULL: one past MAX_DEPTH
        let data = [0x30, 0x01, 0x00];
        let mut cursor = DecodeCursor::new(&data);
        for _ in 0..MAX_DEPTH {
            cursor = cursor.read_nested(cursor.remaining()).unwrap();
        }

        let result = cursor.read_nested(cursor.remaining());
        assert!(
            matches!(result, Err(NestingTooDeep(MAX_DEPTH))),
            "depth {MAX_DEPTH} must be the last level allowed"
        );
    }

    #[test]
    fn encode_cursor_bounds() {
        let mut buf = [0u8; 3];
        let mut cursor = EncodeCursor::new(&mut buf);

        cursor.try_put_u8(0x30).unwrap();
        cursor.try_put_slice(&[0x01, 0x00]).unwrap();
        assert_eq!(cursor.position(), 3);
        assert!(matches!(cursor.try_put_u8(0xff), Err(BufferTooSmall(1, 0))));
        assert_eq!(buf, [0x30, 0x01, 0x00]);
    }
}
