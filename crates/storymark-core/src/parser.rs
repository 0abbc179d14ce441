use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Block, BlockKind, List, Story, Table};
use crate::diagnostic::{Diagnostic, W_LIST_DEFERRED, W_TABLE_RAGGED};
use crate::inline::convert_inline;
use crate::source_map::SourceMap;
use crate::span::Span;

static BULLET_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*] +(.+)").expect("bullet item pattern"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+[.)] +(.+)").expect("ordered item pattern"));

/// Spacing and flushing knobs for the story builder. Gaps are in points.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryOptions {
    /// Gap after a level-one heading.
    pub heading_gap: f32,
    /// Gap standing in for a horizontal rule.
    pub rule_gap: f32,
    pub list_gap: f32,
    pub table_gap: f32,
    /// Flush a pending list before block quotes, paragraphs and page breaks.
    /// When unset, those blocks are emitted ahead of the still-open list.
    pub flush_lists_eagerly: bool,
}

impl Default for StoryOptions {
    fn default() -> Self {
        Self {
            heading_gap: 12.0,
            rule_gap: 12.0,
            list_gap: 8.0,
            table_gap: 12.0,
            flush_lists_eagerly: false,
        }
    }
}

pub struct ParseResult {
    pub story: Story,
    pub diagnostics: Vec<Diagnostic>,
    pub source_map: SourceMap,
}

pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, &StoryOptions::default())
}

pub fn parse_with_options(source: &str, options: &StoryOptions) -> ParseResult {
    let source_map = SourceMap::new(source);
    let lines = split_lines(source);
    let mut builder = StoryBuilder::new(options, &source_map);
    for line in &lines {
        builder.feed(line);
    }
    let (story, diagnostics) = builder.finish();
    log::debug!(
        "built story: {} blocks from {} lines, {} diagnostics",
        story.blocks.len(),
        lines.len(),
        diagnostics.len()
    );
    ParseResult {
        story,
        diagnostics,
        source_map,
    }
}

/// Builds a story from already-split lines, discarding diagnostics.
pub fn build_story<S: AsRef<str>>(lines: &[S]) -> Story {
    let source = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    parse(&source).story
}

#[derive(Clone, Debug)]
struct Line {
    text: String,
    span: Span,
}

/// Splits on `\n`, `\r\n` and a lone `\r`.
fn split_lines(source: &str) -> Vec<Line> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    for (idx, &byte) in bytes.iter().enumerate() {
        let lone_cr = byte == b'\r' && bytes.get(idx + 1) != Some(&b'\n');
        if byte == b'\n' || lone_cr {
            lines.push(make_line(source, start, idx));
            start = idx + 1;
        }
    }
    if start < source.len() {
        lines.push(make_line(source, start, source.len()));
    }
    lines
}

fn make_line(source: &str, start: usize, end: usize) -> Line {
    let text = &source[start..end];
    let text = text.strip_suffix('\r').unwrap_or(text);
    Line {
        text: text.to_string(),
        span: Span::new(start, end),
    }
}

/// What a single source line is, decided in a fixed priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineKind<'a> {
    Blank,
    Rule,
    Heading { level: u8, text: &'a str },
    Quote(&'a str),
    BulletItem(&'a str),
    OrderedItem(&'a str),
    TableRow(&'a str),
    PageBreak,
    Text(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with("---") && trimmed.chars().all(|ch| ch == '-') {
        return LineKind::Rule;
    }
    for (level, marker) in [(1, "# "), (2, "## "), (3, "### ")] {
        if let Some(text) = line.strip_prefix(marker) {
            return LineKind::Heading { level, text };
        }
    }
    if trimmed.starts_with('>') {
        return LineKind::Quote(trimmed.trim_start_matches('>').trim());
    }
    if let Some(item) = capture_item(&BULLET_ITEM, trimmed) {
        return LineKind::BulletItem(item);
    }
    if let Some(item) = capture_item(&ORDERED_ITEM, trimmed) {
        return LineKind::OrderedItem(item);
    }
    if line.contains('|') {
        return LineKind::TableRow(line);
    }
    if trimmed.eq_ignore_ascii_case("pagebreak") {
        return LineKind::PageBreak;
    }
    LineKind::Text(line)
}

fn capture_item<'a>(pattern: &Regex, trimmed: &'a str) -> Option<&'a str> {
    pattern
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|item| item.as_str().trim())
}

/// The one multi-line construct that may be open at a time.
#[derive(Debug)]
enum Pending {
    Idle,
    List {
        ordered: bool,
        span: Span,
        items: Vec<String>,
    },
    Table {
        rows: Vec<(Span, String)>,
    },
}

struct StoryBuilder<'a> {
    options: &'a StoryOptions,
    source_map: &'a SourceMap,
    pending: Pending,
    blocks: Vec<Block>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> StoryBuilder<'a> {
    fn new(options: &'a StoryOptions, source_map: &'a SourceMap) -> Self {
        Self {
            options,
            source_map,
            pending: Pending::Idle,
            blocks: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn feed(&mut self, line: &Line) {
        let span = line.span;
        match classify_line(&line.text) {
            LineKind::Blank => self.flush(),
            LineKind::Rule => {
                self.flush();
                self.push_spacer(span.end, self.options.rule_gap);
            }
            LineKind::Heading { level, text } => {
                self.flush();
                let content = convert_inline(text);
                self.push(span, BlockKind::Heading { level, content });
                if level == 1 {
                    self.push_spacer(span.end, self.options.heading_gap);
                }
            }
            LineKind::Quote(text) => {
                self.flush_table();
                self.settle_lists(span);
                let content = convert_inline(text);
                self.push(span, BlockKind::BlockQuote { content });
            }
            LineKind::BulletItem(item) => self.push_item(false, span, item),
            LineKind::OrderedItem(item) => self.push_item(true, span, item),
            LineKind::TableRow(row) => {
                if !matches!(self.pending, Pending::Table { .. }) {
                    self.flush();
                }
                if let Pending::Idle = self.pending {
                    self.pending = Pending::Table { rows: Vec::new() };
                }
                if let Pending::Table { rows } = &mut self.pending {
                    rows.push((span, row.to_string()));
                }
            }
            LineKind::PageBreak => {
                self.flush_table();
                self.settle_lists(span);
                self.push(span, BlockKind::PageBreak);
            }
            LineKind::Text(text) => {
                self.flush_table();
                self.settle_lists(span);
                let content = convert_inline(text);
                self.push(span, BlockKind::Paragraph { content });
            }
        }
    }

    fn finish(mut self) -> (Story, Vec<Diagnostic>) {
        self.flush();
        (
            Story {
                blocks: self.blocks,
            },
            self.diagnostics,
        )
    }

    fn push_item(&mut self, ordered: bool, span: Span, item: &str) {
        let continues = matches!(
            &self.pending,
            Pending::List { ordered: open, .. } if *open == ordered
        );
        if !continues {
            self.flush();
            self.pending = Pending::List {
                ordered,
                span,
                items: Vec::new(),
            };
        }
        if let Pending::List {
            span: list_span,
            items,
            ..
        } = &mut self.pending
        {
            *list_span = list_span.cover(span);
            items.push(item.to_string());
        }
    }

    /// Handles an open list when a block that does not end lists arrives.
    fn settle_lists(&mut self, span: Span) {
        if !matches!(self.pending, Pending::List { .. }) {
            return;
        }
        if self.options.flush_lists_eagerly {
            self.flush();
        } else {
            self.diagnostics.push(Diagnostic::warning(
                self.source_map.range(span),
                W_LIST_DEFERRED,
                "block emitted while a list is open; the list will follow it",
            ));
        }
    }

    fn flush_table(&mut self) {
        if matches!(self.pending, Pending::Table { .. }) {
            self.flush();
        }
    }

    fn flush(&mut self) {
        match std::mem::replace(&mut self.pending, Pending::Idle) {
            Pending::Idle => {}
            Pending::List {
                ordered,
                span,
                items,
            } => {
                log::trace!(
                    "flushing list ({} items, ordered: {})",
                    items.len(),
                    ordered
                );
                let items = items.iter().map(|item| convert_inline(item)).collect();
                self.push(span, BlockKind::List(List { ordered, items }));
                self.push_spacer(span.end, self.options.list_gap);
            }
            Pending::Table { rows } => self.flush_table_rows(rows),
        }
    }

    fn flush_table_rows(&mut self, rows: Vec<(Span, String)>) {
        let Some(span) = rows
            .iter()
            .map(|(span, _)| *span)
            .reduce(Span::cover)
        else {
            return;
        };
        let mut cells: Vec<(Span, Vec<String>)> = rows
            .iter()
            .filter(|(_, raw)| !raw.trim().is_empty())
            .map(|(span, raw)| (*span, split_table_row(raw)))
            .collect();

        let header = cells.len() >= 2 && cells[1].1.iter().all(|cell| is_divider_cell(cell));
        if header {
            cells.remove(1);
        }

        let columns = cells.first().map(|(_, row)| row.len()).unwrap_or(0);
        let mut table_rows = Vec::with_capacity(cells.len());
        for (row_span, mut row) in cells {
            if row.len() != columns {
                self.diagnostics.push(Diagnostic::warning(
                    self.source_map.range(row_span),
                    W_TABLE_RAGGED,
                    format!(
                        "table row has {} cells, expected {}; row was {}",
                        row.len(),
                        columns,
                        if row.len() < columns {
                            "padded"
                        } else {
                            "truncated"
                        }
                    ),
                ));
                row.resize(columns, String::new());
            }
            table_rows.push(row);
        }
        log::trace!(
            "flushing table ({} rows, {} columns, header: {})",
            table_rows.len(),
            columns,
            header
        );
        self.push(
            span,
            BlockKind::Table(Table {
                header,
                rows: table_rows,
            }),
        );
        self.push_spacer(span.end, self.options.table_gap);
    }

    fn push(&mut self, span: Span, kind: BlockKind) {
        self.blocks.push(Block { span, kind });
    }

    fn push_spacer(&mut self, offset: usize, height: f32) {
        self.push(Span::point(offset), BlockKind::Spacer { height });
    }
}

fn split_table_row(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// A header divider cell: dashes with optional alignment colons at either end.
fn is_divider_cell(cell: &str) -> bool {
    let core = cell.strip_prefix(':').unwrap_or(cell);
    let core = core.strip_suffix(':').unwrap_or(core);
    !core.is_empty() && core.chars().all(|ch| ch == '-')
}
