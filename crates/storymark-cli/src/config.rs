use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use storymark_renderer::{DocumentSetup, ListStyle, Margins, StyleSheet, TableStyle, TextStyle};
use thiserror::Error;

/// Contents of a `--config` TOML file. Every section and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub document: DocumentSection,
    pub page: PageSection,
    pub style: StyleSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentSection {
    pub title: Option<String>,
    pub author: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSection {
    pub paper: Option<String>,
    pub margins: Option<Margins>,
}

/// `[style]` overrides, laid field by field over `StyleSheet::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSection {
    pub body_font: Option<String>,
    pub mono_font: Option<String>,
    pub body: TextSection,
    pub heading1: TextSection,
    pub heading2: TextSection,
    pub heading3: TextSection,
    pub quote: TextSection,
    pub list: ListSection,
    pub table: TableSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextSection {
    pub size: Option<f32>,
    pub leading: Option<f32>,
    pub space_before: Option<f32>,
    pub space_after: Option<f32>,
    pub color: Option<String>,
    pub left_indent: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListSection {
    pub indent: Option<f32>,
    pub body_indent: Option<f32>,
    pub marker_size: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableSection {
    pub font_size: Option<f32>,
    pub header_fill: Option<String>,
    pub header_text: Option<String>,
    pub body_fill: Option<String>,
    pub grid_width: Option<f32>,
    pub grid_color: Option<String>,
    pub cell_padding: Option<f32>,
    pub header_bottom_padding: Option<f32>,
}

fn overlay<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl StyleSection {
    fn apply(&self, style: &mut StyleSheet) {
        overlay(&mut style.body_font, &self.body_font);
        overlay(&mut style.mono_font, &self.mono_font);
        self.body.apply(&mut style.body);
        self.heading1.apply(&mut style.heading1);
        self.heading2.apply(&mut style.heading2);
        self.heading3.apply(&mut style.heading3);
        self.quote.apply(&mut style.quote);
        self.list.apply(&mut style.list);
        self.table.apply(&mut style.table);
    }
}

impl TextSection {
    fn apply(&self, text: &mut TextStyle) {
        overlay(&mut text.size, &self.size);
        overlay(&mut text.leading, &self.leading);
        overlay(&mut text.space_before, &self.space_before);
        overlay(&mut text.space_after, &self.space_after);
        overlay(&mut text.color, &self.color);
        overlay(&mut text.left_indent, &self.left_indent);
    }
}

impl ListSection {
    fn apply(&self, list: &mut ListStyle) {
        overlay(&mut list.indent, &self.indent);
        overlay(&mut list.body_indent, &self.body_indent);
        overlay(&mut list.marker_size, &self.marker_size);
    }
}

impl TableSection {
    fn apply(&self, table: &mut TableStyle) {
        overlay(&mut table.font_size, &self.font_size);
        overlay(&mut table.header_fill, &self.header_fill);
        overlay(&mut table.header_text, &self.header_text);
        overlay(&mut table.body_fill, &self.body_fill);
        overlay(&mut table.grid_width, &self.grid_width);
        overlay(&mut table.grid_color, &self.grid_color);
        overlay(&mut table.cell_padding, &self.cell_padding);
        overlay(&mut table.header_bottom_padding, &self.header_bottom_padding);
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path:?}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config file at {path:?}: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
        path: PathBuf,
    },
    #[error("invalid colour {value:?} for {field} in {path:?}, expected #rrggbb")]
    InvalidColor {
        field: &'static str,
        value: String,
        path: PathBuf,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::from_toml(&text, path)
    }

    fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })?;
        let style = config.style_sheet();
        for (field, value) in style.colors() {
            if !is_hex_color(value) {
                return Err(ConfigError::InvalidColor {
                    field,
                    value: value.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The style sheet with file values laid over the defaults.
    pub fn style_sheet(&self) -> StyleSheet {
        let mut style = StyleSheet::default();
        self.style.apply(&mut style);
        style
    }

    /// The document setup with file values laid over the defaults.
    pub fn document_setup(&self) -> DocumentSetup {
        let mut setup = DocumentSetup::default();
        if let Some(title) = &self.document.title {
            setup.title = title.clone();
        }
        if let Some(author) = &self.document.author {
            setup.author = author.clone();
        }
        if let Some(lang) = &self.document.lang {
            setup.lang = lang.clone();
        }
        if let Some(paper) = &self.page.paper {
            setup.paper = paper.clone();
        }
        if let Some(margins) = self.page.margins {
            setup.margins = margins;
        }
        setup
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, is_hex_color};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use storymark_renderer::StyleSheet;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        Config::from_toml(text, Path::new("storymark.toml"))
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let config = parse("").expect("config");
        assert_eq!(config.document_setup(), storymark_renderer::DocumentSetup::default());
        assert_eq!(config.style_sheet(), StyleSheet::default());
    }

    #[test]
    fn partial_sections_override_only_named_fields() {
        let config = parse(
            r##"
[document]
title = "Annual report"

[page]
paper = "us-letter"
margins = { top = 25.0, bottom = 25.0 }

[style.heading1]
size = 22.0
color = "#112233"
"##,
        )
        .expect("config");
        let setup = config.document_setup();
        assert_eq!(setup.title, "Annual report");
        assert_eq!(setup.author, "Equipe Bit Bashing");
        assert_eq!(setup.paper, "us-letter");
        assert_eq!(setup.margins.top, 25.0);
        assert_eq!(setup.margins.left, 20.0);
        let style = config.style_sheet();
        assert_eq!(style.heading1.size, 22.0);
        assert_eq!(style.heading1.color, "#112233");
        assert_eq!(style.heading2.size, 14.0);
    }

    #[test]
    fn partial_style_sections_keep_their_own_defaults() {
        let config = parse(
            "[style.quote]\nsize = 12.0\n\n[style.heading1]\nsize = 22.0\n\n[style.table]\nfont_size = 8.0\n",
        )
        .expect("config");
        let style = config.style_sheet();
        let defaults = StyleSheet::default();

        assert_eq!(style.quote.size, 12.0);
        assert_eq!(style.quote.color, "#444444");
        assert_eq!(style.quote.left_indent, 18.0);
        assert_eq!(style.quote.leading, defaults.quote.leading);

        assert_eq!(style.heading1.size, 22.0);
        assert_eq!(style.heading1.leading, 24.0);
        assert_eq!(style.heading1.space_after, 12.0);

        assert_eq!(style.table.font_size, 8.0);
        assert_eq!(style.table.header_fill, defaults.table.header_fill);
        assert_eq!(style.list, defaults.list);
        assert_eq!(style.body, defaults.body);
    }

    #[test]
    fn rejects_bad_colours() {
        let err = parse("[style.table]\nheader_fill = \"blue\"\n").expect_err("bad colour");
        assert!(matches!(
            err,
            ConfigError::InvalidColor { field: "table.header_fill", .. }
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse("[page]\npaper_size = \"a5\"\n").expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn hex_colours() {
        assert!(is_hex_color("#B0BEC5"));
        assert!(!is_hex_color("#FFF"));
        assert!(!is_hex_color("B0BEC5"));
        assert!(!is_hex_color("#GGGGGG"));
    }
}
