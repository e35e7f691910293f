//! Inline formatting of a single line.
//!
//! The line is refined in stages, each stage only looking at the plain text
//! left over by the previous one:
//!
//! 1. `$$…$$` display math
//! 2. `$…$` inline math
//! 3. `**…**` strong
//! 4. `*…*` emphasis
//!
//! Delimiters pair up left to right, shortest match first. A delimiter
//! without a partner stays literal text.

use crate::block::Span;
use crate::math::{MathMode, MathRenderer};

/// Split a line into formatted spans.
pub fn format(line: &str, math: &dyn MathRenderer) -> Vec<Span> {
    let spans = vec![Span::Text(line.to_string())];
    let spans = render_math(spans, "$$", MathMode::Display, math);
    let spans = render_math(spans, "$", MathMode::Inline, math);
    let spans = pair_delimiters(spans, "**", Span::Strong);
    emphasize(spans)
}

fn render_math(
    spans: Vec<Span>,
    delim: &str,
    mode: MathMode,
    math: &dyn MathRenderer,
) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            Span::Text(text) => split_math(&text, delim, mode, math, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn split_math(
    text: &str,
    delim: &str,
    mode: MathMode,
    math: &dyn MathRenderer,
    out: &mut Vec<Span>,
) {
    let mut rest = text;
    while let Some(open) = rest.find(delim) {
        let body_start = open + delim.len();
        let Some(len) = rest[body_start..].find(delim) else {
            break;
        };
        let body_end = body_start + len;
        let end = body_end + delim.len();

        push_text(out, &rest[..open]);
        let formula = &rest[body_start..body_end];
        match math.render(formula, mode) {
            Ok(markup) => out.push(Span::Math { mode, markup }),
            Err(err) => {
                log::debug!("leaving {:?} math unrendered: {}", formula, err);
                out.push(Span::Unrendered(rest[open..end].to_string()));
            }
        }
        rest = &rest[end..];
    }
    push_text(out, rest);
}

/// Wrap text between matching `delim` pairs with `wrap`.
///
/// Non-text spans are opaque: they can sit inside a run but never contain
/// a delimiter.
fn pair_delimiters(spans: Vec<Span>, delim: &str, wrap: fn(Vec<Span>) -> Span) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    let mut open: Option<Vec<Span>> = None;

    for span in spans {
        let text = match span {
            Span::Text(text) => text,
            atom => {
                open.as_mut().unwrap_or(&mut out).push(atom);
                continue;
            }
        };

        let mut rest = text.as_str();
        while let Some(at) = rest.find(delim) {
            match open.take() {
                None => {
                    push_text(&mut out, &rest[..at]);
                    open = Some(Vec::new());
                }
                Some(mut inner) => {
                    push_text(&mut inner, &rest[..at]);
                    out.push(wrap(inner));
                }
            }
            rest = &rest[at + delim.len()..];
        }
        push_text(open.as_mut().unwrap_or(&mut out), rest);
    }

    if let Some(inner) = open {
        // Unmatched opener: put it back as written
        push_text(&mut out, delim);
        for span in inner {
            match span {
                Span::Text(text) => push_text(&mut out, &text),
                other => out.push(other),
            }
        }
    }

    out
}

/// Apply `*…*` to the top level and inside every strong run.
fn emphasize(spans: Vec<Span>) -> Vec<Span> {
    pair_delimiters(spans, "*", Span::Emphasis)
        .into_iter()
        .map(emphasize_within)
        .collect()
}

fn emphasize_within(span: Span) -> Span {
    match span {
        Span::Strong(inner) => Span::Strong(emphasize(inner)),
        Span::Emphasis(inner) => Span::Emphasis(inner.into_iter().map(emphasize_within).collect()),
        other => other,
    }
}

/// Append text, merging with a preceding text span.
fn push_text(out: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Span::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Span::Text(text.to_string()));
    }
}

/// Concatenate the visible text of spans, with math shown as its markup.
pub fn plain_text(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(text) | Span::Unrendered(text) => out.push_str(text),
            Span::Strong(inner) | Span::Emphasis(inner) => out.push_str(&plain_text(inner)),
            Span::Math { markup, .. } => out.push_str(markup),
        }
    }
    out
}
