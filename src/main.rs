//! atommark CLI - convert Markdown files to HTML pages.
//!
//! Reads stdin, a single file, or every `*.md` file in a directory.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use atommark::page::{self, split_front_matter, PageError, Template};
use atommark::{build_tree, tokenize, to_html_with_options, Options};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Convert a Markdown subset to HTML.
#[derive(Parser, Debug)]
#[command(name = "atommark", version, about)]
struct Cli {
    /// Markdown file, directory of `*.md` files, or `-` for stdin.
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output directory for file and directory input.
    #[arg(short, long, default_value = "dist")]
    out_dir: PathBuf,

    /// HTML template whose <body> receives the output.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Write the bare HTML fragment without a page scaffold.
    #[arg(long)]
    fragment: bool,

    /// Add slug ids to headings.
    #[arg(long)]
    heading_ids: bool,

    /// Insert href, src and alt values without escaping.
    #[arg(long)]
    raw_attributes: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            escape_attributes: !self.raw_attributes,
            heading_ids: self.heading_ids,
        }
    }

    fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

/// CLI error type.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Page {
        path: PathBuf,
        #[source]
        source: PageError,
    },

    #[error("no Markdown files in {dir}")]
    NoSources { dir: PathBuf },
}

impl CliError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    fn page(path: impl Into<PathBuf>, source: PageError) -> Self {
        Self::Page {
            path: path.into(),
            source,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let options = cli.options();

    if cli.reads_stdin() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| CliError::io("<stdin>", e))?;
        let template = cli.template.as_deref().map(load_template).transpose()?;
        let html = convert(
            &input,
            Path::new("<stdin>"),
            template.as_ref(),
            cli.fragment,
            &options,
        )?;
        return io::stdout()
            .write_all(html.as_bytes())
            .map_err(|e| CliError::io("<stdout>", e));
    }

    let sources = collect_sources(&cli.input)?;
    let template = match cli.template.as_deref() {
        Some(path) => Some(load_template(path)?),
        None if cli.fragment => None,
        None => discover_template(source_dir(&cli.input)),
    };

    fs::create_dir_all(&cli.out_dir).map_err(|e| CliError::io(&cli.out_dir, e))?;
    for source in &sources {
        let written = convert_file(
            source,
            &cli.out_dir,
            template.as_ref(),
            cli.fragment,
            &options,
        )?;
        info!(source = %source.display(), output = %written.display(), "Wrote page");
    }
    Ok(())
}

/// Directory a source path lives in (the path itself for directories).
fn source_dir(input: &Path) -> &Path {
    if input.is_dir() {
        input
    } else {
        input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }
}

/// A single file, or the sorted `*.md` files directly inside a directory.
fn collect_sources(input: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut sources = files_with_extension(input, "md")?;
    if sources.is_empty() {
        return Err(CliError::NoSources {
            dir: input.to_path_buf(),
        });
    }
    sources.sort();
    Ok(sources)
}

fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CliError> {
    let entries = fs::read_dir(dir).map_err(|e| CliError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CliError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    Ok(files)
}

fn load_template(path: &Path) -> Result<Template, CliError> {
    let source = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let template = Template::parse(source).map_err(|e| CliError::page(path, e))?;
    info!(template = %path.display(), "Using template");
    Ok(template)
}

/// First `*.html` file in `dir` by name, if it is a valid template.
fn discover_template(dir: &Path) -> Option<Template> {
    let mut candidates = match files_with_extension(dir, "html") {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to scan for templates");
            return None;
        }
    };
    candidates.sort();
    let path = candidates.into_iter().next()?;

    match load_template(&path) {
        Ok(template) => Some(template),
        Err(e) => {
            warn!(error = %e, "Ignoring template, using default scaffold");
            None
        }
    }
}

fn convert_file(
    source: &Path,
    out_dir: &Path,
    template: Option<&Template>,
    fragment: bool,
    options: &Options,
) -> Result<PathBuf, CliError> {
    let markdown = fs::read_to_string(source).map_err(|e| CliError::io(source, e))?;
    let html = convert(&markdown, source, template, fragment, options)?;

    let mut name = source
        .file_stem()
        .unwrap_or(source.as_os_str())
        .to_os_string();
    name.push(".html");
    let output = out_dir.join(name);
    fs::write(&output, html).map_err(|e| CliError::io(&output, e))?;
    Ok(output)
}

fn convert(
    markdown: &str,
    source: &Path,
    template: Option<&Template>,
    fragment: bool,
    options: &Options,
) -> Result<String, CliError> {
    if tracing::enabled!(tracing::Level::DEBUG) {
        if let Ok((_, body)) = split_front_matter(markdown) {
            let tokens = tokenize(body);
            debug!(source = %source.display(), ?tokens, "Block tokens");
            debug!(source = %source.display(), tree = ?build_tree(tokens), "Document tree");
        }
    }

    if fragment {
        let (_, body) = split_front_matter(markdown).map_err(|e| CliError::page(source, e))?;
        return Ok(to_html_with_options(body, options));
    }
    page::render_page(markdown, template, options).map_err(|e| CliError::page(source, e))
}
