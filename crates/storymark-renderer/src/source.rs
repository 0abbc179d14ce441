use storymark_core::{Block, BlockKind, Inline, List, Story, Table};

use crate::style::{DocumentSetup, StyleSheet, TableStyle, TextStyle};

/// Serializes a story into a standalone Typst document.
///
/// User text only ever appears inside Typst string literals, so characters
/// such as `#`, `*` or `<` in the input are shown verbatim and never
/// interpreted as Typst markup.
pub fn to_typst(story: &Story, setup: &DocumentSetup, style: &StyleSheet) -> String {
    let mut writer = TypstWriter::new();
    emit_preamble(&mut writer, setup, style);
    for block in &story.blocks {
        emit_block(&mut writer, block, style);
    }
    writer.finish()
}

struct TypstWriter {
    out: String,
    indent: usize,
}

impl TypstWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn open(&mut self, line: &str) {
        self.line(line);
        self.indent += 1;
    }

    fn close(&mut self, line: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(line);
    }

    fn finish(self) -> String {
        self.out
    }
}

fn emit_preamble(writer: &mut TypstWriter, setup: &DocumentSetup, style: &StyleSheet) {
    let margins = &setup.margins;
    writer.line(&format!(
        "#set document(title: {}, author: {})",
        string_literal(&setup.title),
        string_literal(&setup.author)
    ));
    writer.line(&format!(
        "#set page(paper: {}, margin: (top: {}mm, right: {}mm, bottom: {}mm, left: {}mm))",
        string_literal(&setup.paper),
        margins.top,
        margins.right,
        margins.bottom,
        margins.left
    ));
    writer.line(&format!(
        "#set text(font: {}, lang: {}, size: {}pt, fill: {})",
        string_literal(&style.body_font),
        string_literal(&setup.lang),
        style.body.size,
        color(&style.body.color)
    ));
    writer.line(&format!(
        "#set par(leading: {}pt, spacing: 0pt)",
        style.body.line_gap()
    ));
    writer.line("#set block(spacing: 0pt)");
    writer.line(&format!(
        "#show raw: set text(font: {})",
        string_literal(&style.mono_font)
    ));
    writer.line("#show heading: set text(weight: \"bold\")");
    for level in 1..=3u8 {
        let heading = style.heading(level);
        let selector = format!("heading.where(level: {})", level);
        writer.line(&format!(
            "#show {}: set text(size: {}pt, fill: {})",
            selector,
            heading.size,
            color(&heading.color)
        ));
        writer.line(&format!(
            "#show {}: set par(leading: {}pt)",
            selector,
            heading.line_gap()
        ));
        writer.line(&format!(
            "#show {}: set block(above: {}pt, below: {}pt)",
            selector, heading.space_before, heading.space_after
        ));
    }
    writer.line(&format!(
        "#set list(marker: text(size: {}pt)[•], indent: {}pt, body-indent: {}pt)",
        style.list.marker_size, style.list.indent, style.list.body_indent
    ));
    writer.line(&format!(
        "#set enum(numbering: n => text(size: {}pt, str(n) + \".\"), indent: {}pt, body-indent: {}pt)",
        style.list.marker_size, style.list.indent, style.list.body_indent
    ));
    writer.line("");
}

fn emit_block(writer: &mut TypstWriter, block: &Block, style: &StyleSheet) {
    match &block.kind {
        BlockKind::Heading { level, content } => {
            writer.line(&format!(
                "#heading(level: {})[{}]",
                (*level).clamp(1, 3),
                render_inlines(content)
            ));
        }
        BlockKind::Paragraph { content } => {
            emit_text_block(writer, &style.body, &render_inlines(content));
        }
        BlockKind::BlockQuote { content } => {
            emit_text_block(writer, &style.quote, &render_inlines(content));
        }
        BlockKind::List(list) => emit_list(writer, list, &style.body),
        BlockKind::Table(table) => emit_table(writer, table, &style.table),
        BlockKind::PageBreak => writer.line("#pagebreak(weak: true)"),
        BlockKind::Spacer { height } => writer.line(&format!("#v({}pt)", height)),
    }
}

fn emit_text_block(writer: &mut TypstWriter, text: &TextStyle, body: &str) {
    writer.open(&format!(
        "#block(above: {}pt, below: {}pt, inset: (left: {}pt))[",
        text.space_before, text.space_after, text.left_indent
    ));
    emit_text_rules(writer, text);
    writer.line(body);
    writer.close("]");
}

fn emit_text_rules(writer: &mut TypstWriter, text: &TextStyle) {
    writer.line(&format!(
        "#set text(size: {}pt, fill: {})",
        text.size,
        color(&text.color)
    ));
    writer.line(&format!("#set par(leading: {}pt)", text.line_gap()));
}

fn emit_list(writer: &mut TypstWriter, list: &List, text: &TextStyle) {
    writer.open("#block[");
    emit_text_rules(writer, text);
    writer.open(if list.ordered { "#enum(" } else { "#list(" });
    for item in &list.items {
        writer.line(&format!("[{}],", render_inlines(item)));
    }
    writer.close(")");
    writer.close("]");
}

/// The first row always gets the header look. A divider row in the source
/// additionally makes it a repeating `table.header`.
fn emit_table(writer: &mut TypstWriter, table: &Table, style: &TableStyle) {
    writer.open("#block[");
    writer.line(&format!("#set text(size: {}pt)", style.font_size));
    writer.open("#table(");
    writer.line(&format!("columns: {},", table.columns().max(1)));
    writer.line("align: left,");
    writer.line(&format!("inset: {}pt,", style.cell_padding));
    writer.line(&format!(
        "stroke: {}pt + {},",
        style.grid_width,
        color(&style.grid_color)
    ));
    writer.line(&format!(
        "fill: (_, y) => if y == 0 {{ {} }} else {{ {} }},",
        color(&style.header_fill),
        color(&style.body_fill)
    ));
    let mut rows = table.rows.iter();
    if let Some(first) = rows.next() {
        if table.header {
            writer.open("table.header(");
        }
        for cell in first {
            writer.line(&format!(
                "table.cell(inset: (x: {pad}pt, top: {pad}pt, bottom: {bottom}pt))[#text(weight: \"bold\", fill: {fill})[#{text}]],",
                pad = style.cell_padding,
                bottom = style.header_bottom_padding,
                fill = color(&style.header_text),
                text = string_literal(cell)
            ));
        }
        if table.header {
            writer.close("),");
        }
    }
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| format!("[#{}]", string_literal(cell)))
            .collect();
        writer.line(&format!("{},", cells.join(", ")));
    }
    writer.close(")");
    writer.close("]");
}

/// Renders inlines as Typst markup built from escaped string literals.
pub fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => {
                out.push('#');
                out.push_str(&string_literal(text));
            }
            Inline::Code(text) => {
                out.push_str("#raw(");
                out.push_str(&string_literal(text));
                out.push(')');
            }
            Inline::Strong(children) => {
                out.push_str("#strong[");
                out.push_str(&render_inlines(children));
                out.push(']');
            }
            Inline::Emph(children) => {
                out.push_str("#emph[");
                out.push_str(&render_inlines(children));
                out.push(']');
            }
        }
    }
    out
}

/// Quotes `text` as a Typst string literal.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn color(hex: &str) -> String {
    format!("rgb({})", string_literal(hex))
}

#[cfg(test)]
mod tests {
    use super::{render_inlines, string_literal};
    use storymark_core::convert_inline;

    #[test]
    fn string_literals_escape_quotes_and_backslashes() {
        assert_eq!(string_literal(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
        assert_eq!(string_literal("tab\there"), "\"tab\\there\"");
    }

    #[test]
    fn inlines_become_nested_typst_calls() {
        let rendered = render_inlines(&convert_inline("**bold** and *it* `x*y`"));
        assert_eq!(
            rendered,
            "#strong[#\"bold\"]#\" and \"#emph[#\"it\"]#\" \"#raw(\"x*y\")"
        );
    }

    #[test]
    fn typst_syntax_in_text_is_quoted() {
        let rendered = render_inlines(&convert_inline("#set page(width: 1pt) $x$ <lbl> @ref"));
        assert_eq!(rendered, "#\"#set page(width: 1pt) $x$ <lbl> @ref\"");
    }
}
