use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use studysheet::{Config, Sheet, Template, sheet};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Standalone A4 HTML page, math typeset by KaTeX in the browser
    Html,
    /// A4 Typst document, compile with `typst compile`
    Typst,
    /// Parsed blocks of each section
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Typst => "typ",
            Format::Json => "json",
        }
    }
}

#[derive(Parser)]
#[command(name = "studysheet")]
#[command(about = "Turn study notes into print-ready A4 sheets")]
struct Cli {
    /// Sheet file (.toml or .json) or plain notes
    input: PathBuf,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Config file
    #[arg(short, long, default_value = "studysheet.toml")]
    config: PathBuf,

    /// Override the sheet's template (one-column, two-column, cornell, qa)
    #[arg(long)]
    template: Option<Template>,

    /// Override the sheet's title
    #[arg(long)]
    title: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let mut sheet = Sheet::load(&cli.input)?;
    if let Some(template) = cli.template {
        sheet.template = template;
    }
    if let Some(title) = cli.title {
        sheet.title = title;
    }

    let rendered = match cli.format {
        Format::Html => sheet::render_html(&sheet, &config),
        Format::Typst => sheet::render_typst(&sheet, &config),
        Format::Json => serde_json::to_string_pretty(&sheet.parse_sections())
            .context("failed to serialize blocks")?,
    };

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension(cli.format.extension()));

    // A .json sheet rendered as json would replace itself
    anyhow::ensure!(
        output != cli.input,
        "output {} would overwrite the input, pass --output",
        output.display()
    );

    fs::write(&output, rendered)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("rendered {} sheet {:?}", sheet.template, sheet.title);

    println!("Created {}", output.display());
    Ok(())
}
