mod ast;
mod diagnostic;
mod emit;
mod inline;
mod parser;
mod source_map;
mod span;

pub use ast::{Block, BlockKind, Inline, InlineSeq, List, Story, Table};
pub use diagnostic::{Diagnostic, DiagnosticSeverity, W_LIST_DEFERRED, W_TABLE_RAGGED};
pub use emit::{emit_markup, escape_markup};
pub use inline::convert_inline;
pub use parser::{
    LineKind, ParseResult, StoryOptions, build_story, classify_line, parse, parse_with_options,
};
pub use source_map::{Position, Range, SourceMap};
pub use span::Span;
