use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{Block, ListItem, Span};
use crate::inline;
use crate::math::{MathMode, MathRenderer};

/// Format one line straight to HTML markup.
pub fn format_inline(line: &str, math: &dyn MathRenderer) -> String {
    let mut out = String::new();
    spans_to_html(&inline::format(line, math), &mut out);
    out
}

/// Convert blocks to an HTML fragment
pub fn blocks_to_html(blocks: &[Block], math: &dyn MathRenderer, out: &mut String) {
    for block in blocks {
        match block {
            Block::Paragraph { text } if text.is_empty() => {
                out.push_str("<div class=\"spacer\"></div>\n");
            }
            Block::Paragraph { text } => wrap_line("p", text, math, out),
            // The sheet title is the page's only <h1>
            Block::Heading1 { text } => wrap_line("h2", text, math, out),
            Block::Heading2 { text } => wrap_line("h3", text, math, out),
            Block::Quote { text } => wrap_line("blockquote", text, math, out),
            Block::Rule => out.push_str("<hr>\n"),
            Block::List { items } => list_to_html(items, math, out),
        }
    }
}

fn wrap_line(tag: &str, text: &str, math: &dyn MathRenderer, out: &mut String) {
    let _ = write!(out, "<{tag}>");
    spans_to_html(&inline::format(text, math), out);
    let _ = writeln!(out, "</{tag}>");
}

fn list_to_html(items: &[ListItem], math: &dyn MathRenderer, out: &mut String) {
    if items.iter().all(|item| item.checked.is_some()) {
        out.push_str("<ul class=\"checklist\">\n");
    } else {
        out.push_str("<ul>\n");
    }

    for item in items {
        out.push_str("<li>");
        match item.checked {
            Some(true) => out.push_str("<input type=\"checkbox\" disabled checked> "),
            Some(false) => out.push_str("<input type=\"checkbox\" disabled> "),
            None => {}
        }
        spans_to_html(&inline::format(&item.text, math), out);
        out.push_str("</li>\n");
    }

    out.push_str("</ul>\n");
}

pub fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_html(span, out);
    }
}

fn span_to_html(span: &Span, out: &mut String) {
    match span {
        Span::Text(text) | Span::Unrendered(text) => out.push_str(&encode_text(text)),
        Span::Strong(inner) => {
            out.push_str("<strong>");
            spans_to_html(inner, out);
            out.push_str("</strong>");
        }
        Span::Emphasis(inner) => {
            out.push_str("<em>");
            spans_to_html(inner, out);
            out.push_str("</em>");
        }
        // Renderer output is trusted markup
        Span::Math {
            mode: MathMode::Inline,
            markup,
        } => {
            let _ = write!(out, "<span class=\"math-inline\">{markup}</span>");
        }
        // Styled as a block, but a span so it may sit inside <p>, <li> and headings
        Span::Math {
            mode: MathMode::Display,
            markup,
        } => {
            let _ = write!(out, "<span class=\"math-display\">{markup}</span>");
        }
    }
}

/// Escape a value for use inside a double-quoted attribute.
pub(crate) fn attribute(value: &str) -> String {
    encode_double_quoted_attribute(value).into_owned()
}
