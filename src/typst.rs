use crate::block::{Block, ListItem, Span};
use crate::inline;
use crate::math::MathRenderer;

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], math: &dyn MathRenderer, out: &mut String) {
    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading1 { .. } | Block::Heading2 { .. } => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, math, out);

                if i + 1 < blocks.len() {
                    i += 1;
                    emit_block(&blocks[i], math, out);
                }
                out.push_str("]\n\n");
            }
            _ => {
                emit_block(block, math, out);
            }
        }

        i += 1;
    }
}

fn emit_block(block: &Block, math: &dyn MathRenderer, out: &mut String) {
    match block {
        // Sheet titles take the first level
        Block::Heading1 { text } => emit_heading("==", text, math, out),
        Block::Heading2 { text } => emit_heading("===", text, math, out),
        Block::Paragraph { text } if text.is_empty() => {
            out.push_str("#v(8pt)\n\n");
        }
        Block::Paragraph { text } => {
            line_to_typst(text, math, out);
            out.push_str("\n\n");
        }
        Block::Quote { text } => {
            out.push_str("#quote(block: true)[");
            line_to_typst(text, math, out);
            out.push_str("]\n\n");
        }
        Block::List { items } => {
            // Wrap list to keep together when small, allow breaks when large
            if items.len() <= 5 {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(items, math, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(items, math, out);
                out.push('\n');
            }
        }
        Block::Rule => {
            out.push_str("#line(length: 100%)\n\n");
        }
    }
}

fn emit_heading(marker: &str, text: &str, math: &dyn MathRenderer, out: &mut String) {
    out.push_str(marker);
    out.push(' ');
    line_to_typst(text, math, out);
    out.push_str("\n\n");
}

fn list_to_typst(items: &[ListItem], math: &dyn MathRenderer, out: &mut String) {
    for item in items {
        out.push_str("- ");
        match item.checked {
            Some(true) => out.push_str("☑ "),
            Some(false) => out.push_str("☐ "),
            None => {}
        }
        line_to_typst(&item.text, math, out);
        out.push('\n');
    }
}

fn line_to_typst(line: &str, math: &dyn MathRenderer, out: &mut String) {
    spans_to_typst(&inline::format(line, math), out);
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_typst(span, out);
    }
}

fn span_to_typst(span: &Span, out: &mut String) {
    match span {
        Span::Text(text) | Span::Unrendered(text) => escape(text, out),
        Span::Strong(inner) => {
            out.push_str("#strong[");
            spans_to_typst(inner, out);
            out.push(']');
        }
        Span::Emphasis(inner) => {
            out.push_str("#emph[");
            spans_to_typst(inner, out);
            out.push(']');
        }
        // `#mitex` is a block equation and centres itself
        Span::Math { markup, .. } => out.push_str(markup),
    }
}

/// Escape special Typst characters
pub(crate) fn escape(text: &str, out: &mut String) {
    // `1. ` at the start of a line opens a numbered list
    let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let enum_dot = digits > 0
        && text[digits..]
            .strip_prefix('.')
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace));

    for (i, ch) in text.char_indices() {
        match ch {
            '.' if enum_dot && i == digits => out.push_str("\\."),
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-' | '+'
            | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}
