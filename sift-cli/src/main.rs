//! Sift CLI
//!
//! Parses a markup file or string, optionally runs a selector over it and
//! prints what matched.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use sift_css::Sift;
use sift_dom::MarkupConfig;
use tracing_subscriber::EnvFilter;

/// Sift: query markup with CSS and jQuery-style selectors
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the whole document as sift sees it
    sift ./index.html

    # Print every matching element
    sift ./index.html -s 'ul > li:not(.hidden)'

    # Print only the text of the matches
    sift ./index.html -s 'h1, h2' --text

    # Parse inline markup
    sift --html '<p>a<b>b</b></p>' -s b --inner

    # Parse BBCode
    sift --bbcode --html '[quote][b]hi[/b][/quote]' -s 'quote > b'
"#)]
struct Cli {
    /// Path to the markup file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse a markup string directly instead of a file
    #[arg(long, value_name = "MARKUP", conflicts_with = "path")]
    html: Option<String>,

    /// Selector to run against the document
    #[arg(short, long, value_name = "SELECTOR")]
    selector: Option<String>,

    /// Print the text of each match
    #[arg(short, long, conflicts_with = "inner")]
    text: bool,

    /// Print the inner markup of each match
    #[arg(short, long)]
    inner: bool,

    /// Use BBCode brackets (`[b]...[/b]`)
    #[arg(long, conflicts_with = "config")]
    bbcode: bool,

    /// Load the markup configuration from a JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// What to print for each node.
#[derive(Debug, Clone, Copy)]
enum Output {
    Outer,
    Inner,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let input = load_input(&cli)?;
    let mut sift = Sift::with_config(config);
    let (dom, doc) = sift.parse(&input);
    tracing::debug!(nodes = dom.len(), "document parsed");

    let output = if cli.text {
        Output::Text
    } else if cli.inner {
        Output::Inner
    } else {
        Output::Outer
    };
    let config = sift.config().clone();
    let render = |node| match output {
        Output::Outer => dom.outer_html(node, &config),
        Output::Inner => dom.inner_html(node, &config),
        Output::Text => dom.text(node, &config),
    };

    let Some(selector) = cli.selector.as_deref() else {
        println!("{}", render(doc));
        return Ok(());
    };

    let matches = sift
        .find(&dom, doc, selector)
        .with_context(|| format!("invalid selector {selector:?}"))?;
    if matches.is_empty() {
        eprintln!("{}", format!("no match for {selector:?}").dimmed());
        return Ok(());
    }
    for (i, &node) in matches.iter().enumerate() {
        println!("{} {}", format!("[{i}]").cyan(), render(node));
    }

    let stats = sift.cache_stats();
    tracing::debug!(
        matches = matches.len(),
        cached = stats.entries,
        warnings = sift_common::warning_count(),
        "query finished"
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<MarkupConfig> {
    if cli.bbcode {
        return Ok(MarkupConfig::bbcode());
    }
    let Some(path) = &cli.config else {
        return Ok(MarkupConfig::default());
    };
    let text = read(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid markup configuration in {}", path.display()))
}

fn load_input(cli: &Cli) -> Result<String> {
    match (&cli.html, &cli.path) {
        (Some(html), _) => Ok(html.clone()),
        (None, Some(path)) => read(path),
        (None, None) => bail!("expected a FILE or --html MARKUP (see --help)"),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
