use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub math: MathConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// Body text size in pixels (HTML) or points (Typst)
    pub font_size: u32,
    pub margin: String,
    pub footer: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            font_size: 16,
            margin: "15mm".to_string(),
            footer: "Generated with Study Sheet Generator, print-ready A4.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MathConfig {
    pub katex_version: String,
    pub mitex_version: String,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            katex_version: "0.16.11".to_string(),
            mitex_version: "0.2.4".to_string(),
        }
    }
}

impl Config {
    /// The config bundled with the binary. `build.rs` checks it parses.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the compiled default if it does not exist.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
