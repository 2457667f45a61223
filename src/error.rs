use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot encode preferences: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),

    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Failed to load: {0}")]
    Load(#[source] Box<AppError>),

    #[error(transparent)]
    Io(#[from] io::Error),
}
