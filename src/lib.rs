mod block;
mod config;
mod error;
pub mod html;
mod inline;
pub mod math;
mod parser;
pub mod sheet;
pub mod typst;

pub use block::{Block, ListItem, Span};
pub use config::{Config, MathConfig, PageConfig};
pub use error::Error;
pub use math::{MathError, MathMode, MathRenderer};
pub use sheet::{Sheet, SheetContent, Template};

/// Parse one text field into a vector of blocks.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    parser::parse(text)
}

/// Split one line into formatted spans, rendering math with `math`.
pub fn format_inline(line: &str, math: &dyn MathRenderer) -> Vec<Span> {
    inline::format(line, math)
}

/// Visible text of formatted spans.
pub fn plain_text(spans: &[Span]) -> String {
    inline::plain_text(spans)
}

/// Convert one text field to an HTML fragment.
pub fn markdown_to_html(text: &str) -> String {
    let mut out = String::new();
    html::blocks_to_html(&parse_blocks(text), &math::Katex, &mut out);
    out
}

/// Convert one text field to Typst markup.
pub fn markdown_to_typst(text: &str) -> String {
    let mut out = String::new();
    typst::blocks_to_typst(&parse_blocks(text), &math::Mitex, &mut out);
    out
}
