use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use storymark_core::Story;
use typst::diag::SourceDiagnostic;
use typst::layout::{Abs, PagedDocument};

mod error;
mod source;
mod style;
mod world;

pub use error::RenderError;
pub use source::{render_inlines, string_literal, to_typst};
pub use style::{DocumentSetup, ListStyle, Margins, StyleSheet, TableStyle, TextStyle};

use world::{FontSlot, StoryWorld};

/// Gap drawn between pages when every page goes into one SVG.
const SVG_PAGE_GAP_PT: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Svg,
    /// The generated Typst source, without laying it out.
    Typst,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
            OutputFormat::Typst => "typ",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "PDF",
            OutputFormat::Svg => "SVG",
            OutputFormat::Typst => "Typst source",
        }
    }
}

/// Lays out stories with a fixed document setup and stylesheet.
pub struct Renderer {
    setup: DocumentSetup,
    style: StyleSheet,
    fonts: FontSlot,
}

impl Renderer {
    pub fn new(setup: DocumentSetup, style: StyleSheet) -> Self {
        Self {
            setup,
            style,
            fonts: FontSlot::load(&[]),
        }
    }

    /// Adds font files, or directories of them, on top of the embedded fonts.
    pub fn with_font_paths(mut self, paths: &[PathBuf]) -> Self {
        if !paths.is_empty() {
            self.fonts = FontSlot::load(paths);
        }
        self
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn typst_source(&self, story: &Story) -> String {
        to_typst(story, &self.setup, &self.style)
    }

    fn compile(&self, story: &Story) -> Result<PagedDocument, RenderError> {
        let started = Instant::now();
        let world = StoryWorld::new(&self.fonts, self.typst_source(story));
        let warned = typst::compile::<PagedDocument>(&world);
        for warning in &warned.warnings {
            log::warn!("typst: {}", describe(&world, warning));
        }
        let document = warned.output.map_err(|errors| {
            RenderError::Compile(errors.iter().map(|err| describe(&world, err)).collect())
        })?;
        log::debug!(
            "laid out {} blocks on {} pages in {:?}",
            story.blocks.len(),
            document.pages.len(),
            started.elapsed()
        );
        Ok(document)
    }

    /// Renders `story` into the bytes of `format`.
    pub fn render(&self, story: &Story, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
        match format {
            OutputFormat::Typst => Ok(self.typst_source(story).into_bytes()),
            OutputFormat::Svg => {
                let document = self.compile(story)?;
                Ok(typst_svg::svg_merged(&document, Abs::pt(SVG_PAGE_GAP_PT)).into_bytes())
            }
            OutputFormat::Pdf => {
                let document = self.compile(story)?;
                typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default()).map_err(|errors| {
                    RenderError::Export(errors.iter().map(|err| err.message.to_string()).collect())
                })
            }
        }
    }

    /// Renders `story` and writes it to `path`, creating parent directories.
    pub fn write(&self, story: &Story, format: OutputFormat, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render(story, format)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, &bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DocumentSetup::default(), StyleSheet::default())
    }
}

fn describe(world: &StoryWorld<'_>, diagnostic: &SourceDiagnostic) -> String {
    match world.line_of(diagnostic.span) {
        Some(line) => format!("line {}: {}", line, diagnostic.message),
        None => diagnostic.message.to_string(),
    }
}
