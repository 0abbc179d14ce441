//! Inline markup: code spans, bold and italic.
//!
//! Conversion runs in three passes with fixed precedence. Each pass works on a
//! token list in which spans recognized by earlier passes are opaque, so a code
//! span is never re-read for emphasis and an italic span may contain bold.

use crate::ast::{Inline, InlineSeq};

#[derive(Clone, Debug)]
enum Token {
    Char(char),
    Span(Inline),
}

impl Token {
    fn is_star(&self) -> bool {
        matches!(self, Token::Char('*'))
    }
}

/// Converts a raw text span into an inline sequence.
///
/// Never fails: markers without a partner stay literal text.
pub fn convert_inline(text: &str) -> InlineSeq {
    let tokens = code_pass(text.trim());
    let tokens = strong_pass(tokens);
    let tokens = emph_pass(tokens);
    collect_inlines(tokens)
}

fn code_pass(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '`' {
            let closing = chars[i + 1..].iter().position(|ch| *ch == '`');
            // An adjacent pair is not a span; retry from the second backtick.
            if let Some(len) = closing.filter(|len| *len > 0) {
                let body: String = chars[i + 1..i + 1 + len].iter().collect();
                out.push(Token::Span(Inline::Code(body)));
                i += len + 2;
                continue;
            }
        }
        out.push(Token::Char(chars[i]));
        i += 1;
    }
    out
}

fn strong_pass(tokens: Vec<Token>) -> Vec<Token> {
    let is_star = |idx: usize| tokens.get(idx).is_some_and(Token::is_star);
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if is_star(i) && is_star(i + 1) {
            let body = i + 2;
            let end = body + run_len(&tokens[body..]);
            if end > body && is_star(end) && is_star(end + 1) {
                let children = collect_inlines(tokens[body..end].to_vec());
                out.push(Token::Span(Inline::Strong(children)));
                i = end + 2;
                continue;
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

fn emph_pass(tokens: Vec<Token>) -> Vec<Token> {
    let is_star = |idx: usize| tokens.get(idx).is_some_and(Token::is_star);
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let opens = is_star(i) && (i == 0 || !is_star(i - 1));
        if opens {
            let body = i + 1;
            let end = body + run_len(&tokens[body..]);
            if end > body && is_star(end) && !is_star(end + 1) {
                let children = collect_inlines(tokens[body..end].to_vec());
                out.push(Token::Span(Inline::Emph(children)));
                i = end + 1;
                continue;
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// Length of the leading run of tokens that are not a literal `*`.
fn run_len(tokens: &[Token]) -> usize {
    tokens.iter().take_while(|token| !token.is_star()).count()
}

fn collect_inlines(tokens: Vec<Token>) -> InlineSeq {
    let mut out = Vec::new();
    let mut text = String::new();
    for token in tokens {
        match token {
            Token::Char(ch) => text.push(ch),
            Token::Span(inline) => {
                if !text.is_empty() {
                    out.push(Inline::Text(std::mem::take(&mut text)));
                }
                out.push(inline);
            }
        }
    }
    if !text.is_empty() {
        out.push(Inline::Text(text));
    }
    out
}
