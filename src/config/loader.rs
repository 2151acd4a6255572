//! Configuration loading from disk.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ConfigDocument;

/// Environment variable holding the path of the backing config file.
pub const CONFIG_PATH_VAR: &str = "NASTOOL_CONFIG";

/// Error type for configuration loading and saving.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backing path was not provided.
    #[error("{0} is not set")]
    MissingPathVar(&'static str),

    /// Failed to read or write the backing file.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid YAML or does not have the expected sections.
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Failed to serialize a document for saving.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Resolve the backing path from [`CONFIG_PATH_VAR`].
pub fn config_path_from_env() -> Result<PathBuf, ConfigError> {
    env::var_os(CONFIG_PATH_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingPathVar(CONFIG_PATH_VAR))
}

/// Read and parse a YAML configuration document.
pub fn load_document(path: &Path) -> Result<ConfigDocument, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `doc` and overwrite `path` with it.
///
/// Non-ASCII text is written as-is.
pub fn save_document(path: &Path, doc: &ConfigDocument) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(doc).map_err(ConfigError::Serialize)?;
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
