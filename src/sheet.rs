//! Study sheets: a title, a layout template and the text fields it shows.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::config::Config;
use crate::error::Error;
use crate::math::{Katex, Mitex};
use crate::{html, parser, typst};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    #[default]
    OneColumn,
    TwoColumn,
    Cornell,
    Qa,
}

impl Template {
    pub fn as_str(self) -> &'static str {
        match self {
            Template::OneColumn => "one-column",
            Template::TwoColumn => "two-column",
            Template::Cornell => "cornell",
            Template::Qa => "qa",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-column" => Ok(Template::OneColumn),
            "two-column" => Ok(Template::TwoColumn),
            "cornell" => Ok(Template::Cornell),
            "qa" => Ok(Template::Qa),
            other => Err(format!(
                "unknown template `{other}` (expected one-column, two-column, cornell or qa)"
            )),
        }
    }
}

/// Every editor field a sheet can hold. Fields the template does not show
/// are kept so switching templates loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetContent {
    pub main: String,
    pub left: String,
    pub right: String,
    pub cues: String,
    pub notes: String,
    pub summary: String,
    pub questions: String,
    pub answers: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sheet {
    pub title: String,
    pub template: Template,
    pub content: SheetContent,
}

impl Default for Sheet {
    fn default() -> Self {
        Self {
            title: "Study Sheet".to_string(),
            template: Template::default(),
            content: SheetContent::default(),
        }
    }
}

/// One labelled field of a sheet, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub key: &'static str,
    pub label: &'static str,
    pub text: &'a str,
}

fn section<'a>(key: &'static str, label: &'static str, text: &'a str) -> Section<'a> {
    Section { key, label, text }
}

/// Parsed blocks of one section, as dumped by `--format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSection {
    pub key: &'static str,
    pub label: &'static str,
    pub blocks: Vec<Block>,
}

impl Sheet {
    /// Load a sheet from TOML or JSON, or wrap any other file as one-column notes.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let sheet = match extension.as_deref() {
            Some("toml") => toml::from_str(content).map_err(|source| Error::SheetToml {
                path: path.to_path_buf(),
                source,
            })?,
            Some("json") => serde_json::from_str(content).map_err(|source| Error::SheetJson {
                path: path.to_path_buf(),
                source,
            })?,
            _ => {
                let title = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Sheet::from_notes(title, content)
            }
        };

        log::debug!(
            "loaded sheet {:?} ({}) from {}",
            sheet.title,
            sheet.template,
            path.display()
        );
        Ok(sheet)
    }

    /// A one-column sheet holding `notes` as its only field.
    pub fn from_notes(title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            template: Template::OneColumn,
            content: SheetContent {
                main: notes.into(),
                ..SheetContent::default()
            },
        }
    }

    /// The fields the current template shows.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let c = &self.content;
        match self.template {
            Template::OneColumn => vec![section("main", "Notes", &c.main)],
            Template::TwoColumn => vec![
                section("left", "Left Column", &c.left),
                section("right", "Right Column", &c.right),
            ],
            Template::Cornell => vec![
                section("cues", "CUES", &c.cues),
                section("notes", "NOTES", &c.notes),
                section("summary", "SUMMARY", &c.summary),
            ],
            Template::Qa => vec![
                section("questions", "Questions", &c.questions),
                section("answers", "Answers", &c.answers),
            ],
        }
    }

    /// Parse every shown field.
    pub fn parse_sections(&self) -> Vec<ParsedSection> {
        self.sections()
            .into_iter()
            .map(|section| ParsedSection {
                key: section.key,
                label: section.label,
                blocks: parser::parse(section.text),
            })
            .collect()
    }
}

const SHEET_CSS: &str = r#"@page { size: A4; margin: 0; }
* { box-sizing: border-box; }
body { margin: 0; background: #f3f4f6; font-family: system-ui, sans-serif; }
.preview.a4 { width: 210mm; min-height: 297mm; margin: 0 auto; background: #fff; line-height: 1.5; }
.preview h1 { font-size: 1.5em; font-weight: 600; margin: 0 0 0.5rem; }
.preview h2 { font-size: 1.3em; margin: 0.6em 0 0.3em; }
.preview h3 { font-size: 1.1em; margin: 0.5em 0 0.25em; }
.preview p { margin: 0; }
.preview blockquote { margin: 0.4em 0; padding-left: 0.8em; border-left: 3px solid #c7d2fe; color: #374151; }
.preview ul { margin: 0.2em 0; padding-left: 1.25rem; }
.preview ul.checklist { list-style: none; padding-left: 0.25rem; }
.preview hr { border: 0; border-top: 1px solid #d1d5db; margin: 0.6em 0; }
.spacer { height: 8px; }
.math-display { display: block; text-align: center; margin: 0.4em 0; }
.label { font-size: 0.75em; font-weight: 600; color: #4b5563; margin-bottom: 0.25rem; }
.two-column, .qa-layout { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.cornell-main { display: grid; grid-template-columns: 30% 1fr; gap: 1rem; min-height: 200mm; }
.cornell-cues { border-right: 1px solid #d1d5db; padding-right: 0.75rem; }
.cornell-summary { border-top: 1px solid #d1d5db; margin-top: 1rem; padding-top: 0.5rem; }
footer { margin-top: 1.5rem; font-size: 0.75em; color: #6b7280; }
@media print { body { background: #fff; } }
"#;

// Only the delimiters `Katex` emits, so unrendered `$…$` stays as typed
const AUTO_RENDER: &str = r#"<script>
document.addEventListener("DOMContentLoaded", () => renderMathInElement(document.body, {
  delimiters: [
    { left: "\\(", right: "\\)", display: false },
    { left: "\\[", right: "\\]", display: true }
  ],
  throwOnError: false
}));
</script>
"#;

/// Render a sheet as a standalone A4 HTML page.
pub fn render_html(sheet: &Sheet, config: &Config) -> String {
    let katex = format!(
        "https://cdn.jsdelivr.net/npm/katex@{}/dist",
        config.math.katex_version
    );
    let katex = html::attribute(&katex);

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", html_escape::encode_text(&sheet.title));
    let _ = writeln!(out, "<link rel=\"stylesheet\" href=\"{katex}/katex.min.css\">");
    let _ = writeln!(out, "<script defer src=\"{katex}/katex.min.js\"></script>");
    let _ = writeln!(out, "<script defer src=\"{katex}/contrib/auto-render.min.js\"></script>");
    out.push_str(AUTO_RENDER);
    let _ = writeln!(out, "<style>\n{SHEET_CSS}</style>\n</head>\n<body>");
    let _ = writeln!(
        out,
        "<div class=\"preview a4\" style=\"font-size: {}px; padding: {};\">",
        config.page.font_size,
        html::attribute(&config.page.margin)
    );
    let _ = writeln!(out, "<h1>{}</h1>", html_escape::encode_text(&sheet.title));

    let sections = sheet.sections();
    match sheet.template {
        Template::OneColumn => html_section(&sections[0], false, &mut out),
        Template::TwoColumn => html_columns("two-column", &sections, false, &mut out),
        Template::Qa => html_columns("qa-layout", &sections, true, &mut out),
        Template::Cornell => {
            out.push_str("<div class=\"cornell-layout\">\n<div class=\"cornell-main\">\n");
            out.push_str("<div class=\"cornell-cues\">\n");
            html_section(&sections[0], true, &mut out);
            out.push_str("</div>\n<div class=\"cornell-notes\">\n");
            html_section(&sections[1], true, &mut out);
            out.push_str("</div>\n</div>\n<div class=\"cornell-summary\">\n");
            html_section(&sections[2], true, &mut out);
            out.push_str("</div>\n</div>\n");
        }
    }

    let _ = writeln!(
        out,
        "<footer>{}</footer>\n</div>\n</body>\n</html>",
        html_escape::encode_text(&config.page.footer)
    );
    out
}

fn html_columns(class: &str, sections: &[Section<'_>], labelled: bool, out: &mut String) {
    let _ = writeln!(out, "<div class=\"{class}\">");
    for section in sections {
        out.push_str("<div>\n");
        html_section(section, labelled, out);
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

fn html_section(section: &Section<'_>, labelled: bool, out: &mut String) {
    if labelled {
        let _ = writeln!(out, "<div class=\"label\">{}</div>", section.label);
    }
    html::blocks_to_html(&parser::parse(section.text), &Katex, out);
}

/// Render a sheet as an A4 Typst document.
pub fn render_typst(sheet: &Sheet, config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#import \"@preview/mitex:{}\": mi, mitex",
        config.math.mitex_version
    );
    let _ = writeln!(
        out,
        "#set page(paper: \"a4\", margin: {}, footer: text(size: 0.75em, fill: gray)[{}])",
        typst_length(&config.page.margin),
        typst_text(&config.page.footer)
    );
    let _ = writeln!(out, "#set text(size: {}pt)", config.page.font_size);
    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");
    let _ = writeln!(out, "= {}\n", typst_text(&sheet.title));

    let sections = sheet.sections();
    match sheet.template {
        Template::OneColumn => typst_section(&sections[0], false, &mut out),
        Template::TwoColumn => typst_grid("(1fr, 1fr)", &sections, false, &mut out),
        Template::Qa => typst_grid("(1fr, 1fr)", &sections, true, &mut out),
        Template::Cornell => {
            typst_grid("(30%, 1fr)", &sections[..2], true, &mut out);
            out.push_str("#line(length: 100%)\n\n");
            typst_section(&sections[2], true, &mut out);
        }
    }
    out
}

fn typst_grid(columns: &str, sections: &[Section<'_>], labelled: bool, out: &mut String) {
    let _ = writeln!(out, "#grid(\n  columns: {columns},\n  gutter: 12pt,");
    for section in sections {
        out.push_str("  [\n");
        typst_section(section, labelled, out);
        out.push_str("  ],\n");
    }
    out.push_str(")\n\n");
}

fn typst_section(section: &Section<'_>, labelled: bool, out: &mut String) {
    if labelled {
        let _ = writeln!(
            out,
            "#text(size: 0.75em, weight: \"semibold\", fill: gray)[{}]\n",
            section.label
        );
    }
    typst::blocks_to_typst(&parser::parse(section.text), &Mitex, out);
}

fn typst_text(text: &str) -> String {
    let mut out = String::new();
    typst::escape(text, &mut out);
    out
}

/// Pass lengths like `15mm` through; anything else falls back to the default margin.
fn typst_length(value: &str) -> &str {
    let value = value.trim();
    let number = ["mm", "cm", "pt", "in", "em"]
        .iter()
        .find_map(|unit| value.strip_suffix(unit));
    match number {
        Some(number) if number.parse::<f64>().is_ok_and(f64::is_finite) => value,
        _ => {
            log::warn!("ignoring page margin {:?}, not a Typst length", value);
            "15mm"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn cornell() -> Sheet {
        Sheet {
            title: "Cells".to_string(),
            template: Template::Cornell,
            content: SheetContent {
                cues: "What is ATP?".to_string(),
                notes: "- **ATP** stores energy".to_string(),
                summary: "Cells run on $ATP$.".to_string(),
                ..SheetContent::default()
            },
        }
    }

    #[test]
    fn template_names_round_trip() {
        for template in [
            Template::OneColumn,
            Template::TwoColumn,
            Template::Cornell,
            Template::Qa,
        ] {
            assert_eq!(template.as_str().parse::<Template>(), Ok(template));
        }
        assert!("three-column".parse::<Template>().is_err());
    }

    #[test]
    fn sections_follow_template() {
        let keys = |sheet: &Sheet| sheet.sections().iter().map(|s| s.key).collect::<Vec<_>>();
        let mut sheet = cornell();
        assert_eq!(keys(&sheet), ["cues", "notes", "summary"]);
        sheet.template = Template::Qa;
        assert_eq!(keys(&sheet), ["questions", "answers"]);
        sheet.template = Template::TwoColumn;
        assert_eq!(keys(&sheet), ["left", "right"]);
        sheet.template = Template::OneColumn;
        assert_eq!(keys(&sheet), ["main"]);
    }

    #[test]
    fn parse_sections_parses_each_field() {
        let parsed = cornell().parse_sections();
        assert_eq!(parsed.len(), 3);
        assert_eq!(
            parsed[0].blocks,
            vec![Block::Paragraph {
                text: "What is ATP?".into()
            }]
        );
        assert!(matches!(parsed[1].blocks[..], [Block::List { .. }]));
    }

    #[test]
    fn load_toml_sheet() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "title = \"Physics\"\ntemplate = \"qa\"\n\n[content]\nquestions = \"What is $F$?\"\nanswers = \"$F = ma$\""
        )
        .unwrap();

        let sheet = Sheet::load(file.path()).unwrap();
        assert_eq!(sheet.title, "Physics");
        assert_eq!(sheet.template, Template::Qa);
        assert_eq!(sheet.content.answers, "$F = ma$");
        assert_eq!(sheet.content.main, "");
    }

    #[test]
    fn load_json_sheet() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"title":"Two","template":"two-column","content":{{"left":"a","right":"b"}}}}"#
        )
        .unwrap();

        let sheet = Sheet::load(file.path()).unwrap();
        assert_eq!(sheet.template, Template::TwoColumn);
        assert_eq!(sheet.content.left, "a");
    }

    #[test]
    fn load_plain_notes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biology.md");
        fs::write(&path, "# Cells\n- nucleus").unwrap();

        let sheet = Sheet::load(&path).unwrap();
        assert_eq!(sheet, Sheet::from_notes("biology", "# Cells\n- nucleus"));
    }

    #[test]
    fn demo_sheet_renders() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/cornell.toml");
        let sheet = Sheet::load(&path).unwrap();
        assert_eq!(sheet.template, Template::Cornell);

        let html = render_html(&sheet, &Config::compiled_default());
        assert!(html.contains("<li><input type=\"checkbox\" disabled checked> Read chapter 4</li>"));
        assert!(html.contains("<span class=\"math-display\">\\[\\Delta G = \\Delta H - T\\Delta S\\]</span>"));

        let typst = render_typst(&sheet, &Config::compiled_default());
        assert!(typst.contains("#mitex(\"\\\\Delta G = \\\\Delta H - T\\\\Delta S\")"));
    }

    #[test]
    fn load_skips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "\u{FEFF}# Cells\n- nucleus").unwrap();
        assert_eq!(
            Sheet::load(&notes).unwrap(),
            Sheet::from_notes("notes", "# Cells\n- nucleus")
        );

        let json = dir.path().join("sheet.json");
        fs::write(&json, "\u{FEFF}{\"title\":\"Bom\"}").unwrap();
        assert_eq!(Sheet::load(&json).unwrap().title, "Bom");
    }

    #[test]
    fn load_reports_bad_sheet() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(
            Sheet::load(file.path()),
            Err(Error::SheetJson { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Sheet::load(&dir.path().join("missing.toml")),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn html_document() {
        let html = render_html(&cornell(), &Config::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Cells</title>"));
        assert!(html.contains("katex@0.16.11/dist/katex.min.css"));
        assert!(html.contains("font-size: 16px; padding: 15mm;"));
        assert!(html.contains("<div class=\"label\">CUES</div>\n<p>What is ATP?</p>"));
        assert!(html.contains("<li><strong>ATP</strong> stores energy</li>"));
        assert!(html.contains("<span class=\"math-inline\">\\(ATP\\)</span>"));
        assert!(html.contains("<footer>Generated with Study Sheet Generator, print-ready A4.</footer>"));
    }

    #[test]
    fn html_one_column_has_no_labels() {
        let sheet = Sheet::from_notes("Plain", "hello");
        let html = render_html(&sheet, &Config::default());
        assert!(html.contains("<h1>Plain</h1>\n<p>hello</p>\n<footer>"));
        assert!(!html.contains("class=\"label\""));
    }

    #[test]
    fn html_escapes_title() {
        let sheet = Sheet::from_notes("<b>A & B</b>", "");
        let html = render_html(&sheet, &Config::default());
        assert!(html.contains("<h1>&lt;b&gt;A &amp; B&lt;/b&gt;</h1>"));
    }

    #[test]
    fn typst_document() {
        let typst = render_typst(&cornell(), &Config::default());
        assert!(typst.starts_with("#import \"@preview/mitex:0.2.4\": mi, mitex\n"));
        assert!(typst.contains("#set page(paper: \"a4\", margin: 15mm,"));
        assert!(typst.contains("#set text(size: 16pt)"));
        assert!(typst.contains("= Cells\n"));
        assert!(typst.contains("#grid(\n  columns: (30%, 1fr),"));
        assert!(typst.contains("- #strong[ATP] stores energy"));
        assert!(typst.contains("Cells run on #mi(\"ATP\")."));
    }

    #[test]
    fn typst_rejects_odd_margins() {
        assert_eq!(typst_length("2cm"), "2cm");
        assert_eq!(typst_length("1.5in"), "1.5in");
        assert_eq!(typst_length("wide"), "15mm");
        assert_eq!(typst_length("10mm); evil"), "15mm");
        assert_eq!(typst_length("nanmm"), "15mm");
        assert_eq!(typst_length("infpt"), "15mm");
    }
}
