use serde::Serialize;

use crate::math::MathMode;

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Strong(Vec<Span>),
    Emphasis(Vec<Span>),
    /// Markup produced by a math renderer
    Math { mode: MathMode, markup: String },
    /// Delimited math source the renderer rejected, kept as typed
    Unrendered(String),
}

/// A single list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub text: String,
    /// For checklists: None = plain bullet, Some(false) = unchecked, Some(true) = checked
    pub checked: Option<bool>,
}

/// Block-level elements parsed from one text field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading1 { text: String },
    Heading2 { text: String },
    Quote { text: String },
    Rule,
    /// An empty `text` marks a blank-line spacer
    Paragraph { text: String },
    List { items: Vec<ListItem> },
}

impl ListItem {
    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: None,
        }
    }

    pub fn task(text: impl Into<String>, checked: bool) -> Self {
        Self {
            text: text.into(),
            checked: Some(checked),
        }
    }
}
