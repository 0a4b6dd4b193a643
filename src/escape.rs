//! HTML escaping utilities.
//!
//! Fast-path optimized: scans for first escapable character,
//! then bulk-copies segments between escapes.
//!
//! The rule is the same everywhere: `&`, `<`, `>` and `"` become entities,
//! everything else is copied. Input is escaped exactly once, so `&amp;` in
//! the source comes out as `&amp;amp;`.

use memchr::{memchr, memchr3};

/// Lookup table for escapable characters.
/// Index by byte value, true if needs escaping.
const ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Escape HTML text content into output buffer.
///
/// # Example
/// ```
/// use atommark::escape::escape_text_into;
///
/// let mut out = String::new();
/// escape_text_into(&mut out, "<script>");
/// assert_eq!(out, "&lt;script&gt;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut String, input: &str) {
    let bytes = input.as_bytes();

    let mut pos = match first_escape(bytes) {
        Some(p) => p,
        None => {
            out.push_str(input);
            return;
        }
    };

    // Start of the segment not yet copied
    let mut copied = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if ESCAPE_TABLE[b as usize] {
            out.push_str(&input[copied..pos]);
            out.push_str(entity(b));
            copied = pos + 1;
        }
        pos += 1;
    }
    out.push_str(&input[copied..]);
}

/// Escape an attribute value (inside double quotes) into output buffer.
///
/// # Example
/// ```
/// use atommark::escape::escape_attr_into;
///
/// let mut out = String::new();
/// escape_attr_into(&mut out, "a\"b");
/// assert_eq!(out, "a&quot;b");
/// ```
#[inline]
pub fn escape_attr_into(out: &mut String, input: &str) {
    out.push_str(&html_escape::encode_double_quoted_attribute(input));
}

#[inline]
fn entity(b: u8) -> &'static str {
    match b {
        b'<' => "&lt;",
        b'>' => "&gt;",
        b'&' => "&amp;",
        b'"' => "&quot;",
        _ => unreachable!("not an escapable byte"),
    }
}

#[inline]
fn first_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr(b'"', input);
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Escape and return as a String.
///
/// Prefer `escape_text_into` to reuse buffers.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    escape_text_into(&mut out, input);
    out
}
