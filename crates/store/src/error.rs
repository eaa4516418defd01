use std::io;
use std::path::{Path, PathBuf};

use settingscraft_core::KeyPathError;
use settingscraft_crypto::EncryptError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings encryption error: {0}")]
    Encryption(#[from] EncryptError),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{0}")]
    InvalidKeyPath(#[from] KeyPathError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Settings codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Could not determine the user data directory")]
    NoDataDir,

    #[error("Failed to read config: {0}")]
    ConfigRead(io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(serde_json::Error),
}

impl SettingsError {
    pub fn is_invalid_key_path(&self) -> bool {
        matches!(self, Self::InvalidKeyPath(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_))
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Map an I/O error on `path` into [`SettingsError::Storage`]
pub(crate) fn storage(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> SettingsError {
    let path = path.to_path_buf();
    move |source| SettingsError::Storage {
        action,
        path,
        source,
    }
}
