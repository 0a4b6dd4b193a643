//! Inline scanner for Markdown.
//!
//! Recursive descent over a single line of text, left to right:
//! 1. `**` opens strong emphasis when a later `**` closes it
//! 2. `*` opens emphasis when a later `*` closes it
//! 3. `[` opens a link when `](` and `)` follow in that exact order
//! 4. Anything else is literal text up to the next `*` or `[`
//!
//! Unmatched delimiters never fail: an unclosed `*`/`**` turns the rest of
//! the text into a literal, and a `[` without its `](…)` tail is emitted as
//! a one-character literal.

pub mod token;

pub use token::InlineToken;

use crate::cursor::Cursor;

/// Scan `text` into inline tokens.
///
/// # Example
/// ```
/// use atommark::inline::{scan_inline, InlineToken};
///
/// let tokens = scan_inline("a *b*");
/// assert_eq!(
///     tokens,
///     vec![
///         InlineToken::text("a "),
///         InlineToken::Italic(vec![InlineToken::text("b")]),
///     ]
/// );
/// ```
pub fn scan_inline(text: &str) -> Vec<InlineToken> {
    let mut tokens = Vec::new();
    scan_into(text, &mut tokens);
    tokens
}

fn scan_into(text: &str, out: &mut Vec<InlineToken>) {
    let mut cursor = Cursor::new(text);
    // A `[` before this offset is known not to open a link
    let mut no_link_before = 0;

    while !cursor.is_eof() {
        let pos = cursor.offset();

        if cursor.at_str("**") {
            let Some(end) = cursor.find_str_from("**", pos + 2) else {
                out.push(InlineToken::text(cursor.rest()));
                return;
            };
            out.push(InlineToken::Bold(scan_inline(cursor.slice(pos + 2, end))));
            cursor.advance(end + 2 - pos);
            continue;
        }

        match cursor.peek() {
            Some(b'*') => {
                let Some(end) = cursor.find_byte_from(b'*', pos + 1) else {
                    out.push(InlineToken::text(cursor.rest()));
                    return;
                };
                out.push(InlineToken::Italic(scan_inline(cursor.slice(pos + 1, end))));
                cursor.advance(end + 1 - pos);
            }
            Some(b'[') => match scan_link(&cursor, no_link_before) {
                Ok((link, end)) => {
                    out.push(link);
                    cursor.advance(end - pos);
                }
                Err(limit) => {
                    no_link_before = limit;
                    out.push(InlineToken::text("["));
                    cursor.advance(1);
                }
            },
            _ => {
                let end = cursor.find_either(b'*', b'[').unwrap_or(text.len());
                out.push(InlineToken::text(cursor.slice(pos, end)));
                cursor.advance(end - pos);
            }
        }
    }
}

/// Try to scan `[text](href)` at the cursor.
///
/// Returns the link token and the offset just past the closing `)`. On
/// failure, returns the offset before which no `[` can open a link either,
/// so a run of brackets is scanned once.
fn scan_link(cursor: &Cursor<'_>, no_link_before: usize) -> Result<(InlineToken, usize), usize> {
    let open = cursor.offset();
    let end = open + cursor.remaining();
    if open < no_link_before {
        return Err(no_link_before);
    }
    // Every `[` up to here would find the same `]`, `(` and `)`
    let close_bracket = cursor.find_byte_from(b']', open).ok_or(end)?;
    let open_paren = close_bracket + 1;
    if cursor.byte_at(open_paren) != Some(b'(') {
        return Err(close_bracket);
    }
    let close_paren = cursor.find_byte_from(b')', open_paren).ok_or(end)?;

    let link = InlineToken::Link {
        href: cursor.slice(open_paren + 1, close_paren).to_owned(),
        children: scan_inline(cursor.slice(open + 1, close_bracket)),
    };
    Ok((link, close_paren + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> InlineToken {
        InlineToken::text(s)
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(scan_inline("Hello, world!"), vec![text("Hello, world!")]);
    }

    #[test]
    fn test_empty() {
        assert!(scan_inline("").is_empty());
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            scan_inline("**bold** and *em*"),
            vec![
                InlineToken::Bold(vec![text("bold")]),
                text(" and "),
                InlineToken::Italic(vec![text("em")]),
            ]
        );
    }

    #[test]
    fn test_italic_inside_bold() {
        assert_eq!(
            scan_inline("**a *b* c**"),
            vec![InlineToken::Bold(vec![
                text("a "),
                InlineToken::Italic(vec![text("b")]),
                text(" c"),
            ])]
        );
    }

    #[test]
    fn test_unterminated_bold_is_literal() {
        assert_eq!(scan_inline("x **y"), vec![text("x "), text("**y")]);
    }

    #[test]
    fn test_unterminated_italic_is_literal() {
        assert_eq!(scan_inline("*oops"), vec![text("*oops")]);
    }

    #[test]
    fn test_empty_bold() {
        assert_eq!(scan_inline("****"), vec![InlineToken::Bold(vec![])]);
    }

    #[test]
    fn test_link() {
        assert_eq!(
            scan_inline("see [docs](http://x) now"),
            vec![
                text("see "),
                InlineToken::Link {
                    href: "http://x".to_owned(),
                    children: vec![text("docs")],
                },
                text(" now"),
            ]
        );
    }

    #[test]
    fn test_bold_inside_link() {
        assert_eq!(
            scan_inline("[**a**](u)"),
            vec![InlineToken::Link {
                href: "u".to_owned(),
                children: vec![InlineToken::Bold(vec![text("a")])],
            }]
        );
    }

    #[test]
    fn test_link_inside_bold() {
        assert_eq!(
            scan_inline("**[a](u)**"),
            vec![InlineToken::Bold(vec![InlineToken::Link {
                href: "u".to_owned(),
                children: vec![text("a")],
            }])]
        );
    }

    #[test]
    fn test_bracket_without_paren() {
        assert_eq!(scan_inline("[a] (b)"), vec![text("["), text("a] (b)")]);
    }

    #[test]
    fn test_failed_bracket_then_link() {
        assert_eq!(
            scan_inline("[a] [b](c)"),
            vec![
                text("["),
                text("a] "),
                InlineToken::Link {
                    href: "c".to_owned(),
                    children: vec![text("b")],
                },
            ]
        );
    }

    #[test]
    fn test_nested_open_bracket_is_link_text() {
        assert_eq!(
            scan_inline("[[x](y)"),
            vec![InlineToken::Link {
                href: "y".to_owned(),
                children: vec![text("["), text("x")],
            }]
        );
    }

    #[test]
    fn test_long_bracket_run() {
        let input = format!("{}]", "[".repeat(20_000));
        let tokens = scan_inline(&input);
        assert_eq!(tokens.len(), 20_001);
        assert_eq!(tokens.last(), Some(&text("]")));
    }

    #[test]
    fn test_bracket_without_close() {
        assert_eq!(scan_inline("a [b"), vec![text("a "), text("["), text("b")]);
    }

    #[test]
    fn test_link_without_close_paren() {
        assert_eq!(scan_inline("[a](b"), vec![text("["), text("a](b")]);
    }

    #[test]
    fn test_empty_link_parts() {
        assert_eq!(
            scan_inline("[](x)"),
            vec![InlineToken::Link {
                href: "x".to_owned(),
                children: vec![],
            }]
        );
    }

    #[test]
    fn test_unicode_text() {
        assert_eq!(
            scan_inline("héllo *wörld*"),
            vec![text("héllo "), InlineToken::Italic(vec![text("wörld")])]
        );
    }
}
