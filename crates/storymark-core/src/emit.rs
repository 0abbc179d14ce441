use crate::ast::Inline;

const CODE_OPEN: &str = "<font face=\"Courier\">";
const CODE_CLOSE: &str = "</font>";

/// Serializes inlines into angle-bracket rich-text markup
/// (`<b>`, `<i>`, `<font face="Courier">`).
///
/// All text is escaped, so the only live tags in the output are the ones
/// introduced here. User text that looks like a tag stays visible text.
pub fn emit_markup(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_markup(&mut out, inlines);
    out
}

fn push_markup(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape_markup(text)),
            Inline::Code(text) => {
                out.push_str(CODE_OPEN);
                out.push_str(&escape_markup(text));
                out.push_str(CODE_CLOSE);
            }
            Inline::Strong(children) => {
                out.push_str("<b>");
                push_markup(out, children);
                out.push_str("</b>");
            }
            Inline::Emph(children) => {
                out.push_str("<i>");
                push_markup(out, children);
                out.push_str("</i>");
            }
        }
    }
}

pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
