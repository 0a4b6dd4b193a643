//! Page assembly around the HTML fragment.
//!
//! The core pipeline only produces a fragment. This module handles what
//! sits around it:
//! - a leading `---` front-matter block of `key: value` lines
//! - a caller template whose `<body>` region receives the fragment
//! - the built-in scaffold used when there is no template

use memchr::{memchr, memmem};

use crate::cursor::Cursor;
use crate::escape::escape_text;
use crate::{to_html_with_options, Options};

/// Title used by the default scaffold when front matter has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Front-matter delimiter line.
const DELIMITER: &str = "---";

const DEFAULT_STYLE: &str = r#"    body {
      margin: 0;
      padding: 50px 0 0;
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
      background-color: #f7f7f7;
      color: #333;
      display: flex;
      justify-content: center;
    }

    .content {
      max-width: 700px;
      background-color: #fff;
      padding: 2rem;
      box-shadow: 0 4px 12px rgba(0,0,0,0.1);
      border-radius: 8px;
    }

    h1, h2, h3, h4, h5, h6 {
      font-weight: 600;
      margin-top: 1.5rem;
      margin-bottom: 1rem;
    }

    p {
      line-height: 1.6;
      margin-bottom: 1rem;
    }

    img {
      max-width: 100%;
      display: block;
      margin: 1rem 0;
      border-radius: 4px;
    }
"#;

/// Errors from page assembly.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("invalid front matter on line {line}: {content:?} (expected `key: value`)")]
    InvalidFrontMatter { line: usize, content: String },

    #[error("invalid template: missing {missing}")]
    InvalidTemplate { missing: &'static str },
}

/// Metadata from a leading `---` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(String, String)>,
}

impl FrontMatter {
    /// Value of the first entry named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `title` entry.
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// Entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split a leading front-matter block off `input`.
///
/// Returns the parsed block (if any) and the Markdown that follows it.
/// Without a closing `---` line the whole input is Markdown.
///
/// # Example
/// ```
/// use atommark::page::split_front_matter;
///
/// let (meta, body) = split_front_matter("---\ntitle: Hi\n---\n# Body").unwrap();
/// assert_eq!(meta.unwrap().title(), Some("Hi"));
/// assert_eq!(body, "# Body");
/// ```
pub fn split_front_matter(input: &str) -> Result<(Option<FrontMatter>, &str), PageError> {
    let mut cursor = Cursor::new(input);
    if !is_delimiter(cursor.consume_line()) {
        return Ok((None, input));
    }

    let mut lines = Vec::new();
    while !cursor.is_eof() {
        let line = cursor.consume_line();
        if is_delimiter(line) {
            let front_matter = parse_entries(&lines)?;
            return Ok((Some(front_matter), cursor.rest()));
        }
        lines.push(line);
    }

    Ok((None, input))
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn parse_entries(lines: &[&str]) -> Result<FrontMatter, PageError> {
    let mut entries = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let invalid = || PageError::InvalidFrontMatter {
            // The opening delimiter is line 1
            line: i + 2,
            content: (*line).to_owned(),
        };
        let (key, value) = trimmed.split_once(':').ok_or_else(invalid)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid());
        }
        entries.push((key.to_owned(), unquote(value.trim()).to_owned()));
    }
    Ok(FrontMatter { entries })
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// A validated HTML page template.
///
/// Everything from the opening `<body…>` tag through the last `</body>` is
/// replaced by the rendered fragment.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    /// Offset of `<body`.
    body_start: usize,
    /// Offset just past the last `</body>`.
    body_end: usize,
}

impl Template {
    /// Validate a template.
    ///
    /// It must contain `<html>` or `<!DOCTYPE html>`, a `<head>`, and a
    /// `<body>` … `</body>` region. Tags match ASCII case-insensitively.
    pub fn parse(source: impl Into<String>) -> Result<Self, PageError> {
        let source = source.into();
        let lower = source.to_ascii_lowercase();
        let bytes = lower.as_bytes();

        let has_root =
            find_tag(bytes, b"html").is_some() || memmem::find(bytes, b"<!doctype html").is_some();
        if !has_root {
            return Err(PageError::InvalidTemplate {
                missing: "<html> or <!DOCTYPE html>",
            });
        }
        if find_tag(bytes, b"head").is_none() {
            return Err(PageError::InvalidTemplate { missing: "<head>" });
        }
        let body_start = find_tag(bytes, b"body")
            .ok_or(PageError::InvalidTemplate { missing: "<body>" })?;
        let open_end = memchr(b'>', &bytes[body_start..])
            .map(|i| body_start + i + 1)
            .ok_or(PageError::InvalidTemplate { missing: "<body>" })?;
        let body_end = memmem::rfind(&bytes[open_end..], b"</body>")
            .map(|i| open_end + i + "</body>".len())
            .ok_or(PageError::InvalidTemplate { missing: "</body>" })?;

        Ok(Self {
            source,
            body_start,
            body_end,
        })
    }

    /// Substitute `fragment` into the body region.
    pub fn render(&self, fragment: &str) -> String {
        let head = &self.source[..self.body_start];
        let tail = &self.source[self.body_end..];
        let mut out = String::with_capacity(head.len() + fragment.len() + tail.len() + 16);
        out.push_str(head);
        out.push_str("<body>\n");
        out.push_str(fragment);
        out.push_str("\n</body>");
        out.push_str(tail);
        out
    }

    /// The template text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Offset of `<name` followed by `>` or whitespace, in lowercased bytes.
fn find_tag(lower: &[u8], name: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(i) = memchr(b'<', &lower[from..]) {
        let start = from + i;
        let after = start + 1 + name.len();
        if lower[start + 1..].starts_with(name)
            && lower
                .get(after)
                .is_some_and(|&b| b == b'>' || b.is_ascii_whitespace())
        {
            return Some(start);
        }
        from = start + 1;
    }
    None
}

/// The built-in page scaffold.
pub fn default_page(fragment: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <title>{title}</title>\n  <style>\n{DEFAULT_STYLE}  </style>\n</head>\n<body>\n  <div class=\"content\">\n{fragment}\n  </div>\n</body>\n</html>\n",
        title = escape_text(title),
    )
}

/// Render a full page: strip front matter, convert, wrap.
///
/// With a template, the fragment goes into its body; otherwise the default
/// scaffold is used with the front-matter title (or [`DEFAULT_TITLE`]).
pub fn render_page(
    markdown: &str,
    template: Option<&Template>,
    options: &Options,
) -> Result<String, PageError> {
    let (front_matter, body) = split_front_matter(markdown)?;
    let fragment = to_html_with_options(body, options);
    let page = match template {
        Some(template) => template.render(&fragment),
        None => {
            let title = front_matter
                .as_ref()
                .and_then(FrontMatter::title)
                .unwrap_or(DEFAULT_TITLE);
            default_page(&fragment, title)
        }
    };
    Ok(page)
}
