use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser as ClapParser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use storymark_core::{StoryOptions, parse_with_options};
use storymark_renderer::{OutputFormat, Renderer};

mod config;

use config::Config;

const DEFAULT_INPUT: &str = "docs/Relatorio_Migracao_Justina.md";

#[derive(ClapParser)]
#[command(version, about = "Convert a Markdown report into a paginated document", long_about = None)]
struct Cli {
    /// Markdown file to convert
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Output file; defaults to INPUT with the format's extension
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Pdf)]
    format: Format,
    /// Document title, overrides the config file
    #[arg(long)]
    title: Option<String>,
    /// Document author, overrides the config file
    #[arg(long)]
    author: Option<String>,
    /// TOML file with [document], [page] and [style] sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Extra font file or directory; may be repeated
    #[arg(long = "font-path", value_name = "PATH")]
    font_paths: Vec<PathBuf>,
    /// Emit a pending list before a quote, paragraph or page break
    #[arg(long)]
    flush_lists: bool,
    /// Exit with an error status when the input produced any warning
    #[arg(long)]
    deny_warnings: bool,
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Svg,
    Typst,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Pdf => OutputFormat::Pdf,
            Format::Svg => OutputFormat::Svg,
            Format::Typst => OutputFormat::Typst,
        }
    }
}

fn init_logger(level: log::LevelFilter) -> Result<()> {
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose.log_level_filter())?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut setup = config.document_setup();
    if let Some(title) = cli.title {
        setup.title = title;
    }
    if let Some(author) = cli.author {
        setup.author = author;
    }
    let style = config.style_sheet();

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let options = StoryOptions {
        flush_lists_eagerly: cli.flush_lists,
        ..StoryOptions::default()
    };
    let parsed = parse_with_options(&source, &options);
    for diagnostic in &parsed.diagnostics {
        log::warn!("{}:{}", cli.input.display(), diagnostic);
    }

    let format = OutputFormat::from(cli.format);
    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension(format.extension()));
    let renderer = Renderer::new(setup, style).with_font_paths(&cli.font_paths);
    renderer
        .write(&parsed.story, format, &output)
        .with_context(|| format!("failed to render {}", output.display()))?;
    println!("{} written to: {}", format.label(), output.display());

    if cli.deny_warnings && !parsed.diagnostics.is_empty() {
        bail!(
            "{} warning(s) in {}",
            parsed.diagnostics.len(),
            cli.input.display()
        );
    }
    Ok(())
}
