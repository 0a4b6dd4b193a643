//! Block tokenizer implementation.

use memchr::memchr;
use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::inline::scan_inline;

use super::token::{BlockToken, ListKind};

/// Highest heading level recognized by the `#` prefix.
const MAX_HEADING_LEVEL: usize = 6;

/// Opening and closing marker of a fenced code block.
const FENCE: &str = "```";

/// State for an open fenced code block.
#[derive(Debug)]
struct FenceState<'a> {
    /// Language tag from the opening fence.
    lang: Option<&'a str>,
    /// Captured lines, verbatim.
    lines: Vec<&'a str>,
}

impl<'a> FenceState<'a> {
    /// Open a fence; `info` is the text after the backticks.
    fn open(info: &'a str) -> Self {
        let len = info
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        Self {
            lang: (len > 0).then(|| &info[..len]),
            lines: Vec::new(),
        }
    }

    fn into_token(self) -> BlockToken {
        BlockToken::CodeBlock {
            content: self.lines.join("\n"),
            lang: self.lang.map(str::to_owned),
        }
    }
}

/// Block tokenizer state.
///
/// Everything the line loop needs lives here: the paragraph buffer, the
/// list buffer with its kind, and the open fence (if any).
pub struct BlockTokenizer<'a> {
    /// Current cursor position.
    cursor: Cursor<'a>,
    /// Trimmed lines of the paragraph being collected.
    paragraph_lines: SmallVec<[&'a str; 8]>,
    /// Item text of the list being collected.
    list_items: SmallVec<[&'a str; 8]>,
    /// Kind of the list being collected.
    list_kind: Option<ListKind>,
    /// Current fenced code block state, if inside one.
    fence: Option<FenceState<'a>>,
}

impl<'a> BlockTokenizer<'a> {
    /// Create a new tokenizer.
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            paragraph_lines: SmallVec::new(),
            list_items: SmallVec::new(),
            list_kind: None,
            fence: None,
        }
    }

    /// Tokenize all lines and collect tokens.
    pub fn tokenize(&mut self, tokens: &mut Vec<BlockToken>) {
        while !self.cursor.is_eof() {
            let line = self.cursor.consume_line();
            self.process_line(line, tokens);
        }

        self.close_paragraph(tokens);
        self.close_list(tokens);

        // An unterminated fence keeps what it captured
        if let Some(fence) = self.fence.take() {
            tokens.push(fence.into_token());
        }
    }

    /// Process a single line.
    fn process_line(&mut self, line: &'a str, tokens: &mut Vec<BlockToken>) {
        if let Some(info) = line.strip_prefix(FENCE) {
            match self.fence.take() {
                Some(fence) => tokens.push(fence.into_token()),
                None => {
                    self.close_blocks(tokens);
                    self.fence = Some(FenceState::open(info));
                }
            }
            return;
        }

        if let Some(fence) = self.fence.as_mut() {
            fence.lines.push(line);
            return;
        }

        let line = line.trim();
        if line.is_empty() {
            self.close_blocks(tokens);
            return;
        }

        if let Some((level, content)) = match_heading(line) {
            self.close_blocks(tokens);
            tokens.push(BlockToken::Heading {
                level,
                content: scan_inline(content),
            });
            return;
        }

        if let Some((alt, src)) = match_image(line) {
            self.close_blocks(tokens);
            tokens.push(BlockToken::Image {
                alt: alt.to_owned(),
                src: src.to_owned(),
            });
            return;
        }

        if let Some((text, href)) = match_bare_link(line) {
            self.close_blocks(tokens);
            tokens.push(BlockToken::Link {
                href: href.to_owned(),
                text: text.to_owned(),
            });
            return;
        }

        if let Some(item) = match_bullet_item(line) {
            self.push_list_item(ListKind::Unordered, item, tokens);
            return;
        }

        if let Some(item) = match_ordered_item(line) {
            self.push_list_item(ListKind::Ordered, item, tokens);
            return;
        }

        // Otherwise, it's paragraph content
        self.close_list(tokens);
        self.paragraph_lines.push(line);
    }

    fn push_list_item(&mut self, kind: ListKind, item: &'a str, tokens: &mut Vec<BlockToken>) {
        self.close_paragraph(tokens);
        if self.list_kind != Some(kind) {
            self.close_list(tokens);
        }
        self.list_kind = Some(kind);
        self.list_items.push(item);
    }

    /// Flush the paragraph, then the list.
    fn close_blocks(&mut self, tokens: &mut Vec<BlockToken>) {
        self.close_paragraph(tokens);
        self.close_list(tokens);
    }

    fn close_paragraph(&mut self, tokens: &mut Vec<BlockToken>) {
        if self.paragraph_lines.is_empty() {
            return;
        }
        let text = self.paragraph_lines.join(" ");
        self.paragraph_lines.clear();
        tokens.push(BlockToken::Paragraph {
            content: scan_inline(&text),
        });
    }

    fn close_list(&mut self, tokens: &mut Vec<BlockToken>) {
        let kind = self.list_kind.take();
        if self.list_items.is_empty() {
            return;
        }
        let items = self.list_items.drain(..).map(str::to_owned).collect();
        if let Some(kind) = kind {
            tokens.push(BlockToken::list(kind, items));
        }
    }
}

/// `#`–`######`, whitespace, content.
fn match_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > MAX_HEADING_LEVEL {
        return None;
    }
    let content = after_whitespace(&line[hashes..])?;
    Some((hashes as u8, content))
}

/// A whole line of the form `![alt](src)` with a non-empty `src`.
fn match_image(line: &str) -> Option<(&str, &str)> {
    let (alt, src) = split_bracketed(line.strip_prefix('!')?)?;
    (!src.is_empty()).then_some((alt, src))
}

/// A whole line of the form `[text](href)`, both parts non-empty.
fn match_bare_link(line: &str) -> Option<(&str, &str)> {
    let (text, href) = split_bracketed(line)?;
    (!text.is_empty() && !href.is_empty()).then_some((text, href))
}

/// Split `[a](b)` into `a` and `b`.
///
/// Uses the inline link rules (first `]`, then `(` right after it, then the
/// first `)`), and the `)` has to end the line.
fn split_bracketed(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let close = memchr(b']', rest.as_bytes())?;
    let tail = rest[close + 1..].strip_prefix('(')?;
    let paren = memchr(b')', tail.as_bytes())?;
    (paren + 1 == tail.len()).then(|| (&rest[..close], &tail[..paren]))
}

/// `-`, `*` or `+`, whitespace, content.
fn match_bullet_item(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('+'))?;
    after_whitespace(rest)
}

/// ASCII digits, `.`, whitespace, content.
fn match_ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    after_whitespace(line[digits..].strip_prefix('.')?)
}

/// Require at least one leading whitespace character and non-empty text after it.
fn after_whitespace(s: &str) -> Option<&str> {
    if !s.starts_with(char::is_whitespace) {
        return None;
    }
    let content = s.trim_start();
    (!content.is_empty()).then_some(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::InlineToken;

    fn tokenize(input: &str) -> Vec<BlockToken> {
        let mut tokens = Vec::new();
        BlockTokenizer::new(input).tokenize(&mut tokens);
        tokens
    }

    fn text(s: &str) -> InlineToken {
        InlineToken::text(s)
    }

    fn items(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\n \t ").is_empty());
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let input = format!("{} Title", "#".repeat(level as usize));
            assert_eq!(
                tokenize(&input),
                vec![BlockToken::Heading {
                    level,
                    content: vec![text("Title")],
                }]
            );
        }
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        assert_eq!(
            tokenize("####### Title"),
            vec![BlockToken::Paragraph {
                content: vec![text("####### Title")],
            }]
        );
    }

    #[test]
    fn test_heading_requires_whitespace() {
        assert_eq!(
            tokenize("#Title"),
            vec![BlockToken::Paragraph {
                content: vec![text("#Title")],
            }]
        );
        assert_eq!(
            tokenize("#"),
            vec![BlockToken::Paragraph {
                content: vec![text("#")],
            }]
        );
    }

    #[test]
    fn test_heading_inline_markup() {
        assert_eq!(
            tokenize("## A **b**"),
            vec![BlockToken::Heading {
                level: 2,
                content: vec![text("A "), InlineToken::Bold(vec![text("b")])],
            }]
        );
    }

    #[test]
    fn test_paragraph_lines_joined_with_space() {
        assert_eq!(
            tokenize("  one  \ntwo\n\nthree"),
            vec![
                BlockToken::Paragraph {
                    content: vec![text("one two")],
                },
                BlockToken::Paragraph {
                    content: vec![text("three")],
                },
            ]
        );
    }

    #[test]
    fn test_image_line() {
        assert_eq!(
            tokenize("![A cat](cat.png)"),
            vec![BlockToken::Image {
                alt: "A cat".to_owned(),
                src: "cat.png".to_owned(),
            }]
        );
    }

    #[test]
    fn test_image_with_empty_alt() {
        assert_eq!(
            tokenize("![](cat.png)"),
            vec![BlockToken::Image {
                alt: String::new(),
                src: "cat.png".to_owned(),
            }]
        );
    }

    #[test]
    fn test_bare_link_line() {
        assert_eq!(
            tokenize("[text](http://x)"),
            vec![BlockToken::Link {
                href: "http://x".to_owned(),
                text: "text".to_owned(),
            }]
        );
    }

    #[test]
    fn test_link_inside_text_stays_inline() {
        let tokens = tokenize("see [a](b) here");
        assert!(matches!(tokens.as_slice(), [BlockToken::Paragraph { .. }]));
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            tokenize("- a\n* b\n+ c"),
            vec![BlockToken::UnorderedList {
                items: items(&["a", "b", "c"]),
            }]
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            tokenize("1. first\n2. second\n10. tenth"),
            vec![BlockToken::OrderedList {
                items: items(&["first", "second", "tenth"]),
            }]
        );
    }

    #[test]
    fn test_list_kind_change_splits_lists() {
        assert_eq!(
            tokenize("- a\n1. b\n- c"),
            vec![
                BlockToken::UnorderedList { items: items(&["a"]) },
                BlockToken::OrderedList { items: items(&["b"]) },
                BlockToken::UnorderedList { items: items(&["c"]) },
            ]
        );
    }

    #[test]
    fn test_blank_line_splits_lists() {
        assert_eq!(
            tokenize("- a\n\n- b"),
            vec![
                BlockToken::UnorderedList { items: items(&["a"]) },
                BlockToken::UnorderedList { items: items(&["b"]) },
            ]
        );
    }

    #[test]
    fn test_paragraph_flushed_before_list() {
        assert_eq!(
            tokenize("intro\n- a\nafter"),
            vec![
                BlockToken::Paragraph {
                    content: vec![text("intro")],
                },
                BlockToken::UnorderedList { items: items(&["a"]) },
                BlockToken::Paragraph {
                    content: vec![text("after")],
                },
            ]
        );
    }

    #[test]
    fn test_bold_line_is_not_a_list_item() {
        assert_eq!(
            tokenize("**bold** text"),
            vec![BlockToken::Paragraph {
                content: vec![InlineToken::Bold(vec![text("bold")]), text(" text")],
            }]
        );
    }

    #[test]
    fn test_code_block_with_lang() {
        assert_eq!(
            tokenize("```js\nlet x=1;\n```"),
            vec![BlockToken::CodeBlock {
                content: "let x=1;".to_owned(),
                lang: Some("js".to_owned()),
            }]
        );
    }

    #[test]
    fn test_code_block_is_verbatim() {
        assert_eq!(
            tokenize("```\n  # not a heading\n\n- not a list\n```"),
            vec![BlockToken::CodeBlock {
                content: "  # not a heading\n\n- not a list".to_owned(),
                lang: None,
            }]
        );
    }

    #[test]
    fn test_fence_lang_is_word_only() {
        assert_eq!(
            tokenize("```rust,ignore\nx\n```"),
            vec![BlockToken::CodeBlock {
                content: "x".to_owned(),
                lang: Some("rust".to_owned()),
            }]
        );
        assert_eq!(
            tokenize("``` rust\nx\n```"),
            vec![BlockToken::CodeBlock {
                content: "x".to_owned(),
                lang: None,
            }]
        );
    }

    #[test]
    fn test_fence_flushes_paragraph_first() {
        assert_eq!(
            tokenize("para\n```\ncode\n```\nmore"),
            vec![
                BlockToken::Paragraph {
                    content: vec![text("para")],
                },
                BlockToken::CodeBlock {
                    content: "code".to_owned(),
                    lang: None,
                },
                BlockToken::Paragraph {
                    content: vec![text("more")],
                },
            ]
        );
    }

    #[test]
    fn test_unterminated_fence_keeps_content() {
        assert_eq!(
            tokenize("```py\nprint(1)\n"),
            vec![BlockToken::CodeBlock {
                content: "print(1)".to_owned(),
                lang: Some("py".to_owned()),
            }]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            tokenize("# A\r\n\r\nb\r\nc"),
            vec![
                BlockToken::Heading {
                    level: 1,
                    content: vec![text("A")],
                },
                BlockToken::Paragraph {
                    content: vec![text("b c")],
                },
            ]
        );
    }

    #[test]
    fn test_match_helpers() {
        assert_eq!(match_heading("### x  y"), Some((3, "x  y")));
        assert_eq!(match_heading("#\tx"), Some((1, "x")));
        assert_eq!(match_bullet_item("-x"), None);
        assert_eq!(match_ordered_item("1.x"), None);
        assert_eq!(match_ordered_item("a. x"), None);
        assert_eq!(match_ordered_item("12. x"), Some("x"));
        assert_eq!(split_bracketed("[a](b) c"), None);
        assert_eq!(split_bracketed("[a] (b)"), None);
        assert_eq!(split_bracketed("[a](b)"), Some(("a", "b")));
        assert_eq!(match_bare_link("[](b)"), None);
        assert_eq!(match_image("![a]()"), None);
    }
}
