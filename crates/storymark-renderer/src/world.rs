use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};

static TYPST_LIBRARY: Lazy<LazyHash<Library>> = Lazy::new(|| LazyHash::new(Library::default()));

/// The fonts available to a compilation: embedded ones first, then extra files.
pub(crate) struct FontSlot {
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
}

impl FontSlot {
    pub(crate) fn load(extra_paths: &[PathBuf]) -> Self {
        let mut book = FontBook::new();
        let mut fonts = Vec::new();

        for font_bytes in typst_assets::fonts() {
            push_font_bytes(&mut book, &mut fonts, font_bytes);
        }
        let embedded = fonts.len();

        for path in expand_font_paths(extra_paths) {
            match std::fs::read(&path) {
                Ok(font_bytes) => push_font_bytes(&mut book, &mut fonts, font_bytes),
                Err(err) => log::warn!("skipping font {}: {}", path.display(), err),
            }
        }
        log::debug!(
            "loaded {} fonts ({} embedded, {} from disk)",
            fonts.len(),
            embedded,
            fonts.len() - embedded
        );

        Self {
            book: LazyHash::new(book),
            fonts,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.fonts.len()
    }
}

fn push_font_bytes<T>(book: &mut FontBook, fonts: &mut Vec<Font>, bytes: T)
where
    T: AsRef<[u8]> + Send + Sync + 'static,
{
    let buffer = Bytes::new(bytes);
    for font in Font::iter(buffer) {
        book.push(font.info().clone());
        fonts.push(font);
    }
}

fn expand_font_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            match std::fs::read_dir(path) {
                Ok(entries) => {
                    let mut files: Vec<PathBuf> = entries
                        .flatten()
                        .map(|entry| entry.path())
                        .filter(|entry| is_font_file(entry))
                        .collect();
                    files.sort();
                    out.extend(files);
                }
                Err(err) => log::warn!("cannot read font directory {}: {}", path.display(), err),
            }
        } else if is_font_file(path) {
            out.push(path.clone());
        } else {
            log::warn!("not a font file or directory: {}", path.display());
        }
    }
    out
}

fn is_font_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "ttf" | "otf" | "ttc" | "otc"
    )
}

/// A single-file Typst world holding the generated story source.
pub(crate) struct StoryWorld<'a> {
    library: &'a LazyHash<Library>,
    book: &'a LazyHash<FontBook>,
    fonts: &'a [Font],
    source: Source,
    main_id: FileId,
}

impl<'a> StoryWorld<'a> {
    pub(crate) fn new(fonts: &'a FontSlot, text: String) -> Self {
        let main_id = FileId::new(None, VirtualPath::new("story.typ"));
        Self {
            library: &TYPST_LIBRARY,
            book: &fonts.book,
            fonts: &fonts.fonts,
            source: Source::new(main_id, text),
            main_id,
        }
    }

    /// 1-based line of a diagnostic span, when it points into the story source.
    pub(crate) fn line_of(&self, span: typst::syntax::Span) -> Option<usize> {
        if span.id() != Some(self.main_id) {
            return None;
        }
        let range = self.source.range(span)?;
        let before = self.source.text().get(..range.start)?;
        Some(before.matches('\n').count() + 1)
    }
}

impl World for StoryWorld<'_> {
    fn library(&self) -> &LazyHash<Library> {
        self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.book
    }

    fn main(&self) -> FileId {
        self.main_id
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main_id {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        None
    }
}
