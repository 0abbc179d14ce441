use serde::Deserialize;

/// Page geometry and document metadata handed to the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSetup {
    pub title: String,
    pub author: String,
    /// Text language used for hyphenation and quotes.
    pub lang: String,
    /// Typst paper name, e.g. `a4` or `us-letter`.
    pub paper: String,
    /// Margins in millimetres.
    pub margins: Margins,
}

impl Default for DocumentSetup {
    fn default() -> Self {
        Self {
            title: "Relatório Técnico e Financeiro — Migração Justina AI".to_string(),
            author: "Equipe Bit Bashing".to_string(),
            lang: "pt".to_string(),
            paper: "a4".to_string(),
            margins: Margins::uniform(20.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

/// The fixed look of a rendered story. Sizes are in points, colours `#rrggbb`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub body_font: String,
    pub mono_font: String,
    pub body: TextStyle,
    pub heading1: TextStyle,
    pub heading2: TextStyle,
    pub heading3: TextStyle,
    pub quote: TextStyle,
    pub list: ListStyle,
    pub table: TableStyle,
}

impl StyleSheet {
    pub fn heading(&self, level: u8) -> &TextStyle {
        match level {
            1 => &self.heading1,
            2 => &self.heading2,
            _ => &self.heading3,
        }
    }

    /// Every colour value with the name of the field it came from.
    pub fn colors(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("body.color", self.body.color.as_str()),
            ("heading1.color", self.heading1.color.as_str()),
            ("heading2.color", self.heading2.color.as_str()),
            ("heading3.color", self.heading3.color.as_str()),
            ("quote.color", self.quote.color.as_str()),
            ("table.header_fill", self.table.header_fill.as_str()),
            ("table.header_text", self.table.header_text.as_str()),
            ("table.body_fill", self.table.body_fill.as_str()),
            ("table.grid_color", self.table.grid_color.as_str()),
        ]
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            body_font: "Libertinus Serif".to_string(),
            mono_font: "DejaVu Sans Mono".to_string(),
            body: TextStyle {
                size: 10.0,
                leading: 14.0,
                space_before: 6.0,
                space_after: 8.0,
                ..TextStyle::default()
            },
            heading1: TextStyle {
                size: 18.0,
                leading: 24.0,
                space_before: 0.0,
                space_after: 12.0,
                ..TextStyle::default()
            },
            heading2: TextStyle {
                size: 14.0,
                leading: 20.0,
                space_before: 12.0,
                space_after: 10.0,
                ..TextStyle::default()
            },
            heading3: TextStyle {
                size: 12.0,
                leading: 18.0,
                space_before: 12.0,
                space_after: 8.0,
                ..TextStyle::default()
            },
            quote: TextStyle {
                size: 11.0,
                leading: 14.0,
                space_before: 4.0,
                space_after: 8.0,
                color: "#444444".to_string(),
                left_indent: 18.0,
            },
            list: ListStyle::default(),
            table: TableStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub color: String,
    pub left_indent: f32,
}

impl TextStyle {
    /// Extra gap between lines on top of the font size.
    pub fn line_gap(&self) -> f32 {
        (self.leading - self.size).max(0.0)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            leading: 12.0,
            space_before: 0.0,
            space_after: 0.0,
            color: "#000000".to_string(),
            left_indent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListStyle {
    pub indent: f32,
    pub body_indent: f32,
    pub marker_size: f32,
}

impl Default for ListStyle {
    fn default() -> Self {
        Self {
            indent: 6.0,
            body_indent: 12.0,
            marker_size: 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub header_fill: String,
    pub header_text: String,
    pub body_fill: String,
    pub grid_width: f32,
    pub grid_color: String,
    pub cell_padding: f32,
    pub header_bottom_padding: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            header_fill: "#F0F3F5".to_string(),
            header_text: "#001C40".to_string(),
            body_fill: "#FFFFFF".to_string(),
            grid_width: 0.25,
            grid_color: "#B0BEC5".to_string(),
            cell_padding: 5.0,
            header_bottom_padding: 8.0,
        }
    }
}
