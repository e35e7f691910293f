use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid sheet {}: {source}", path.display())]
    SheetToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid sheet {}: {source}", path.display())]
    SheetJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}
