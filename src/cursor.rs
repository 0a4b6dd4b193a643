//! Byte-offset cursor over UTF-8 text.
//!
//! All markers the scanners look for (`*`, `[`, `]`, `(`, `)`, `#`,
//! line endings) are ASCII, so every offset the cursor stops at is a
//! valid `char` boundary and slicing never panics.

use memchr::{memchr, memchr2, memmem};

/// A cursor for forward scanning of a `&str`.
///
/// # Example
/// ```
/// use atommark::cursor::Cursor;
///
/// let mut cursor = Cursor::new("Hello, World!");
///
/// assert_eq!(cursor.peek(), Some(b'H'));
/// cursor.advance(7);
/// assert_eq!(cursor.rest(), "World!");
/// ```
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of `input`.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current offset from the start of input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Number of bytes remaining.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Check if cursor is at end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Advance by n bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.pos += n;
    }

    /// Byte at an absolute offset.
    #[inline]
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(offset).copied()
    }

    /// Check whether the remaining input starts with `prefix`.
    #[inline]
    pub fn at_str(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// The unconsumed part of the input.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Slice of the input between two absolute offsets.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Absolute offset of the next `needle` at or after `from`.
    #[inline]
    pub fn find_byte_from(&self, needle: u8, from: usize) -> Option<usize> {
        let haystack = self.input.as_bytes().get(from..)?;
        memchr(needle, haystack).map(|i| from + i)
    }

    /// Absolute offset of the next `needle` at or after `from`.
    #[inline]
    pub fn find_str_from(&self, needle: &str, from: usize) -> Option<usize> {
        let haystack = self.input.as_bytes().get(from..)?;
        memmem::find(haystack, needle.as_bytes()).map(|i| from + i)
    }

    /// Absolute offset of the next `a` or `b` at or after the cursor.
    #[inline]
    pub fn find_either(&self, a: u8, b: u8) -> Option<usize> {
        memchr2(a, b, self.rest().as_bytes()).map(|i| self.pos + i)
    }

    /// Consume one line and return it without its terminator.
    ///
    /// `\n`, `\r\n` and a lone `\r` all end a line.
    #[inline]
    pub fn consume_line(&mut self) -> &'a str {
        let start = self.pos;
        match self.find_either(b'\n', b'\r') {
            Some(end) => {
                let bytes = self.input.as_bytes();
                self.pos = if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
                    end + 2
                } else {
                    end + 1
                };
                &self.input[start..end]
            }
            None => {
                self.pos = self.input.len();
                &self.input[start..]
            }
        }
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset())
            .field("remaining", &self.remaining())
            .finish()
    }
}
