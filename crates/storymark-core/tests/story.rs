use pretty_assertions::assert_eq;
use rstest::rstest;
use storymark_core::{
    BlockKind, Inline, List, StoryOptions, Table, W_LIST_DEFERRED, W_TABLE_RAGGED, build_story,
    parse, parse_with_options,
};

fn text(value: &str) -> Vec<Inline> {
    vec![Inline::Text(value.to_string())]
}

fn items(values: &[&str]) -> Vec<Vec<Inline>> {
    values.iter().map(|value| text(value)).collect()
}

fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
    values
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn kinds(lines: &[&str]) -> Vec<BlockKind> {
    build_story(lines).blocks.into_iter().map(|block| block.kind).collect()
}

fn spacer(height: f32) -> BlockKind {
    BlockKind::Spacer { height }
}

#[test]
fn blank_line_separates_unordered_and_ordered_lists() {
    assert_eq!(
        kinds(&["- a", "- b", "", "1. x", "2. y"]),
        vec![
            BlockKind::List(List {
                ordered: false,
                items: items(&["a", "b"]),
            }),
            spacer(8.0),
            BlockKind::List(List {
                ordered: true,
                items: items(&["x", "y"]),
            }),
            spacer(8.0),
        ]
    );
}

#[test]
fn divider_row_promotes_header() {
    assert_eq!(
        kinds(&["Col A|Col B", "---|---", "1|2"]),
        vec![
            BlockKind::Table(Table {
                header: true,
                rows: rows(&[&["Col A", "Col B"], &["1", "2"]]),
            }),
            spacer(12.0),
        ]
    );
}

#[test]
fn table_without_divider_has_no_header() {
    let story = build_story(&["| a | b |", "| c | d |"]);
    let BlockKind::Table(table) = &story.blocks[0].kind else {
        panic!("expected table");
    };
    assert!(!table.header);
    assert_eq!(table.header_row(), None);
    assert_eq!(table.body_rows().len(), 2);
    assert_eq!(table.columns(), 2);
}

#[test]
fn aligned_divider_is_recognized() {
    let story = build_story(&["| Name | Qty |", "|:-----|----:|", "| x | 1 |"]);
    let BlockKind::Table(table) = &story.blocks[0].kind else {
        panic!("expected table");
    };
    assert!(table.header);
    assert_eq!(table.header_row(), Some(&["Name".to_string(), "Qty".to_string()][..]));
    assert_eq!(table.body_rows(), &rows(&[&["x", "1"]])[..]);
}

#[test]
fn heading_pagebreak_and_paragraph() {
    assert_eq!(
        kinds(&["# Title", "", "pagebreak", "", "Body text."]),
        vec![
            BlockKind::Heading {
                level: 1,
                content: text("Title"),
            },
            spacer(12.0),
            BlockKind::PageBreak,
            BlockKind::Paragraph {
                content: text("Body text."),
            },
        ]
    );
}

#[rstest]
#[case("## Section", 2)]
#[case("### Detail", 3)]
fn lower_headings_have_no_spacer(#[case] line: &str, #[case] level: u8) {
    let story = kinds(&[line]);
    assert_eq!(story.len(), 1);
    assert!(matches!(story[0], BlockKind::Heading { level: found, .. } if found == level));
}

#[rstest]
#[case("---")]
#[case("----------")]
#[case("---   ")]
fn rule_flushes_and_emits_spacer(#[case] rule: &str) {
    assert_eq!(
        kinds(&["- a", rule, "after"]),
        vec![
            BlockKind::List(List {
                ordered: false,
                items: items(&["a"]),
            }),
            spacer(8.0),
            spacer(12.0),
            BlockKind::Paragraph {
                content: text("after"),
            },
        ]
    );
}

#[test]
fn switching_list_kind_flushes_previous_list() {
    assert_eq!(
        kinds(&["* a", "1) b", "- c"]),
        vec![
            BlockKind::List(List {
                ordered: false,
                items: items(&["a"]),
            }),
            spacer(8.0),
            BlockKind::List(List {
                ordered: true,
                items: items(&["b"]),
            }),
            spacer(8.0),
            BlockKind::List(List {
                ordered: false,
                items: items(&["c"]),
            }),
            spacer(8.0),
        ]
    );
}

#[test]
fn ordered_list_drops_source_numbering() {
    assert_eq!(
        kinds(&["7. seven", "3. three"]),
        vec![
            BlockKind::List(List {
                ordered: true,
                items: items(&["seven", "three"]),
            }),
            spacer(8.0),
        ]
    );
}

#[test]
fn list_items_are_inline_converted() {
    let story = kinds(&["- **key**: value"]);
    let BlockKind::List(list) = &story[0] else {
        panic!("expected list");
    };
    assert_eq!(
        list.items[0],
        vec![
            Inline::Strong(text("key")),
            Inline::Text(": value".to_string())
        ]
    );
}

#[test]
fn paragraph_ends_table() {
    assert_eq!(
        kinds(&["a|b", "closing words"]),
        vec![
            BlockKind::Table(Table {
                header: false,
                rows: rows(&[&["a", "b"]]),
            }),
            spacer(12.0),
            BlockKind::Paragraph {
                content: text("closing words"),
            },
        ]
    );
}

#[test]
fn table_row_flushes_list() {
    let story = kinds(&["- item", "a|b"]);
    assert!(matches!(story[0], BlockKind::List(_)));
    assert!(matches!(story[2], BlockKind::Table(_)));
}

#[test]
fn quote_flushes_table_but_not_list() {
    assert_eq!(
        kinds(&["- a", "> note", "- b"]),
        vec![
            BlockKind::BlockQuote {
                content: text("note"),
            },
            BlockKind::List(List {
                ordered: false,
                items: items(&["a", "b"]),
            }),
            spacer(8.0),
        ]
    );
    assert_eq!(
        kinds(&["a|b", "> note"]),
        vec![
            BlockKind::Table(Table {
                header: false,
                rows: rows(&[&["a", "b"]]),
            }),
            spacer(12.0),
            BlockKind::BlockQuote {
                content: text("note"),
            },
        ]
    );
}

#[test]
fn deferred_list_is_reported() {
    let parsed = parse("- a\n> note\n");
    assert_eq!(parsed.diagnostics.len(), 1);
    let diagnostic = &parsed.diagnostics[0];
    assert_eq!(diagnostic.code, W_LIST_DEFERRED);
    assert_eq!(diagnostic.range.start.line, 1);
}

#[test]
fn eager_flush_keeps_source_order() {
    let options = StoryOptions {
        flush_lists_eagerly: true,
        ..StoryOptions::default()
    };
    let parsed = parse_with_options("- a\n> note\n- b\n", &options);
    let kinds: Vec<&BlockKind> = parsed.story.kinds().collect();
    assert!(matches!(kinds[0], BlockKind::List(list) if list.items.len() == 1));
    assert!(matches!(kinds[2], BlockKind::BlockQuote { .. }));
    assert!(matches!(kinds[3], BlockKind::List(list) if list.items.len() == 1));
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn ragged_rows_are_normalized() {
    let parsed = parse("a|b|c\n---|---|---\n1|2\n1|2|3|4\n");
    let BlockKind::Table(table) = &parsed.story.blocks[0].kind else {
        panic!("expected table");
    };
    assert_eq!(
        table.rows,
        rows(&[&["a", "b", "c"], &["1", "2", ""], &["1", "2", "3"]])
    );
    let codes: Vec<&str> = parsed.diagnostics.iter().map(|diag| diag.code).collect();
    assert_eq!(codes, vec![W_TABLE_RAGGED, W_TABLE_RAGGED]);
    assert_eq!(parsed.diagnostics[0].range.start.line, 2);
}

#[test]
fn end_of_document_flushes() {
    let story = kinds(&["intro", "- last"]);
    assert_eq!(story.len(), 3);
    assert!(matches!(story[2], BlockKind::Spacer { .. }));
}

#[test]
fn block_quote_strips_all_markers() {
    assert_eq!(
        kinds(&[">> *deep* quote"]),
        vec![BlockKind::BlockQuote {
            content: vec![
                Inline::Emph(text("deep")),
                Inline::Text(" quote".to_string())
            ],
        }]
    );
}

#[test]
fn spans_point_at_source_lines() {
    let source = "# Title\n\n- a\n- b\n";
    let parsed = parse(source);
    let blocks = &parsed.story.blocks;
    assert_eq!(blocks[0].span.slice(source), "# Title");
    assert!(blocks[1].span.is_empty());
    assert_eq!(blocks[2].span.slice(source), "- a\n- b");
}

#[test]
fn empty_document_builds_empty_story() {
    assert!(parse("").story.is_empty());
    assert!(parse("\n\n   \n").story.is_empty());
}
