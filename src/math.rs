//! Math renderers used by the inline formatter.
//!
//! A renderer turns one formula into markup for a particular host. It may
//! reject a formula, in which case the formatter keeps the delimited source
//! text instead.

use serde::Serialize;
use thiserror::Error;

/// Whether a formula sits inside running text or on its own line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MathMode {
    Inline,
    Display,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("formula is empty")]
    Empty,
    #[error("unbalanced braces in formula")]
    UnbalancedBraces,
    #[error("formula ends with a dangling backslash")]
    DanglingEscape,
}

pub trait MathRenderer {
    fn render(&self, formula: &str, mode: MathMode) -> Result<String, MathError>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, MathMode) -> Result<String, MathError>,
{
    fn render(&self, formula: &str, mode: MathMode) -> Result<String, MathError> {
        self(formula, mode)
    }
}

/// Reject formulas no TeX engine could typeset.
pub fn check_formula(formula: &str) -> Result<(), MathError> {
    if formula.trim().is_empty() {
        return Err(MathError::Empty);
    }

    let mut depth = 0usize;
    let mut chars = formula.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                // `\{` and `\}` are literal braces
                if chars.next().is_none() {
                    return Err(MathError::DanglingEscape);
                }
            }
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1).ok_or(MathError::UnbalancedBraces)?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(MathError::UnbalancedBraces)
    }
}

/// Markup for KaTeX's client-side auto-render extension.
///
/// The formula is HTML-escaped and wrapped in `\(…\)` or `\[…\]`; the page
/// loading the output typesets it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Katex;

impl MathRenderer for Katex {
    fn render(&self, formula: &str, mode: MathMode) -> Result<String, MathError> {
        check_formula(formula)?;
        let escaped = html_escape::encode_text(formula);
        Ok(match mode {
            MathMode::Inline => format!("\\({escaped}\\)"),
            MathMode::Display => format!("\\[{escaped}\\]"),
        })
    }
}

/// Typst calls into the `mitex` package, which typesets LaTeX math.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mitex;

impl MathRenderer for Mitex {
    fn render(&self, formula: &str, mode: MathMode) -> Result<String, MathError> {
        check_formula(formula)?;
        let literal = typst_string(formula.trim());
        Ok(match mode {
            MathMode::Inline => format!("#mi({literal})"),
            MathMode::Display => format!("#mitex({literal})"),
        })
    }
}

fn typst_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
