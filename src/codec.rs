//! Length-prefixed byte records for slot persistence.
//!
//! Every persisted value (credential map, watchlist, session, quote
//! cache) serializes through these two cursors so the framing rules -
//! one count byte, then length-prefixed string fields - live in exactly
//! one place.  Decoding is strict: trailing or missing bytes fail the
//! whole record rather than yielding a half-read value.

use heapless::String;

/// Bounds-checked forward writer over a byte buffer.
pub(crate) struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
    overflow: bool,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            overflow: false,
        }
    }

    pub fn u8(&mut self, value: u8) {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = value;
            self.pos += 1;
        } else {
            self.overflow = true;
        }
    }

    /// Write `text` as a one-byte length followed by its bytes.
    pub fn str_field(&mut self, text: &str) {
        let bytes = text.as_bytes();
        if bytes.len() > u8::MAX as usize {
            self.overflow = true;
            return;
        }
        self.u8(bytes.len() as u8);
        if self.pos + bytes.len() <= self.buf.len() {
            self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
            self.pos += bytes.len();
        } else {
            self.overflow = true;
        }
    }

    /// Bytes written, or `None` if the buffer was too small.
    pub fn finish(self) -> Option<usize> {
        if self.overflow {
            None
        } else {
            Some(self.pos)
        }
    }
}

/// Strict forward reader over a serialized record.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn u8(&mut self) -> Option<u8> {
        let value = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(value)
    }

    /// Read a length-prefixed string field into a bounded string.
    /// Fails on truncated input, invalid UTF-8, or capacity overflow.
    pub fn str_field<const N: usize>(&mut self) -> Option<String<N>> {
        let len = self.u8()? as usize;
        let end = self.pos.checked_add(len)?;
        let raw = self.data.get(self.pos..end)?;
        self.pos = end;
        let text = core::str::from_utf8(raw).ok()?;
        let mut out = String::new();
        out.push_str(text).ok()?;
        Some(out)
    }

    /// True once the whole record has been consumed.
    pub fn done(&self) -> bool {
        self.pos == self.data.len()
    }
}
