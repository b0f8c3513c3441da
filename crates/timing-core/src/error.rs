use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimingError {
    #[error("No performance timing API is available in this environment")]
    Unsupported,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse timing capture: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimingError>;
