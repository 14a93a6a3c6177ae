use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or editing `distpack.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },
}
