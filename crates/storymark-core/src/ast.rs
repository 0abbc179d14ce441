use crate::span::Span;

pub type InlineSeq = Vec<Inline>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Inline {
    Text(String),
    /// Fixed-width span. The content is never parsed for emphasis.
    Code(String),
    Strong(InlineSeq),
    Emph(InlineSeq),
}

impl Inline {
    /// Concatenated text content with all formatting removed.
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        push_plain(&mut out, inlines);
        out
    }
}

fn push_plain(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Strong(children) | Inline::Emph(children) => push_plain(out, children),
        }
    }
}

/// The ordered sequence of layout blocks produced from one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Story {
    pub blocks: Vec<Block>,
}

impl Story {
    pub fn kinds(&self) -> impl Iterator<Item = &BlockKind> {
        self.blocks.iter().map(|block| &block.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub span: Span,
    pub kind: BlockKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    Heading { level: u8, content: InlineSeq },
    Paragraph { content: InlineSeq },
    BlockQuote { content: InlineSeq },
    List(List),
    Table(Table),
    PageBreak,
    /// Vertical gap in points.
    Spacer { height: f32 },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<InlineSeq>,
}

/// Cells hold literal text. When `header` is set the first row is the header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    pub header: bool,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn columns(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn header_row(&self) -> Option<&[String]> {
        if self.header {
            self.rows.first().map(Vec::as_slice)
        } else {
            None
        }
    }

    pub fn body_rows(&self) -> &[Vec<String>] {
        if self.header && !self.rows.is_empty() {
            &self.rows[1..]
        } else {
            &self.rows
        }
    }
}
