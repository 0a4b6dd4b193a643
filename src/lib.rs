//! atommark: small, deterministic Markdown-subset to HTML compiler
//!
//! Three pure stages, run in order:
//! 1. [`block::tokenize`]: text → block tokens (headings and paragraphs
//!    carry inline tokens already)
//! 2. [`tree::build_tree`]: block tokens → [`Document`]
//! 3. [`render::render`]: document → HTML fragment
//!
//! # Design Principles
//! - Total: every input produces HTML, unmatched markup becomes text
//! - No regex: byte-level scanning with `memchr`
//! - No shared state: each call is independent
//!
//! Page assembly (front matter, templates, default scaffold) lives in
//! [`page`] and sits on top of the pipeline.

pub mod block;
pub mod cursor;
pub mod escape;
pub mod inline;
pub mod page;
pub mod render;
pub mod tree;

// Re-export primary types
pub use block::{tokenize, BlockToken, ListKind};
pub use inline::{scan_inline, InlineToken};
pub use page::{render_page, FrontMatter, PageError, Template};
pub use render::{HtmlRenderer, HtmlWriter};
pub use tree::{build_tree, Document, Node};

/// Rendering options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Escape `href`, `src` and `alt` values. When off, they are inserted
    /// verbatim.
    pub escape_attributes: bool,
    /// Give every heading an `id` derived from its text.
    pub heading_ids: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            escape_attributes: true,
            heading_ids: false,
        }
    }
}

/// Convert Markdown to HTML.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = atommark::to_html("# Hello\n\nWorld");
/// assert_eq!(html, "<h1>Hello</h1>\n<p>World</p>");
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    let writer = HtmlWriter::with_capacity_for(input.len());
    render_to_writer(input, writer, options).into_string()
}

/// Convert Markdown to HTML, appending to a provided buffer.
///
/// Renders directly into `out`, so a buffer cleared between calls keeps
/// its allocation.
pub fn to_html_into(input: &str, out: &mut String) {
    let writer = HtmlWriter::from_string(std::mem::take(out), input.len());
    *out = render_to_writer(input, writer, &Options::default()).into_string();
}

/// Parse Markdown into a document tree without rendering it.
pub fn parse(input: &str) -> Document {
    build_tree(tokenize(input))
}

/// Run the whole pipeline into `writer`.
fn render_to_writer(input: &str, writer: HtmlWriter, options: &Options) -> HtmlWriter {
    let tokens = tokenize(input);
    let block_count = tokens.len();
    let doc = build_tree(tokens);

    let mut renderer = HtmlRenderer::new(writer, *options);
    renderer.document(&doc);
    let writer = renderer.finish();

    tracing::debug!(
        input_len = input.len(),
        blocks = block_count,
        output_len = writer.len(),
        "Rendered markdown"
    );
    writer
}
