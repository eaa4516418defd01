//! Store configuration

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use settingscraft_crypto::Algorithm;
use tracing::info;

use crate::paths::DEFAULT_FILE_NAME;
use crate::{Result, SettingsError};

/// Options fixed for the lifetime of a [`Store`](crate::Store)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage directory (defaults to the platform user data directory)
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Settings file name inside `dir`
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Write through a temp file + rename
    #[serde(default = "default_true")]
    pub atomic_save: bool,

    /// Indent JSON output
    #[serde(default)]
    pub prettify: bool,

    /// Indent width when prettifying
    #[serde(default = "default_num_spaces")]
    pub num_spaces: usize,

    /// Cipher used when `encryption_key` is set
    #[serde(default)]
    pub encryption_algorithm: Algorithm,

    /// Passphrase enabling at-rest encryption
    #[serde(default)]
    pub encryption_key: Option<String>,
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_num_spaces() -> usize {
    2
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_name: default_file_name(),
            atomic_save: true,
            prettify: false,
            num_spaces: default_num_spaces(),
            encryption_algorithm: Algorithm::default(),
            encryption_key: None,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("dir", &self.dir)
            .field("file_name", &self.file_name)
            .field("atomic_save", &self.atomic_save)
            .field("prettify", &self.prettify)
            .field("num_spaces", &self.num_spaces)
            .field("encryption_algorithm", &self.encryption_algorithm)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl StoreConfig {
    /// Load a config from a JSON file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(SettingsError::ConfigRead)?;
            let config: StoreConfig =
                serde_json::from_str(&content).map_err(SettingsError::ConfigParse)?;
            info!("Loaded store config from {:?}", path);
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_atomic_save(mut self, atomic_save: bool) -> Self {
        self.atomic_save = atomic_save;
        self
    }

    pub fn with_prettify(mut self, prettify: bool) -> Self {
        self.prettify = prettify;
        self
    }

    pub fn with_num_spaces(mut self, num_spaces: usize) -> Self {
        self.num_spaces = num_spaces;
        self
    }

    pub fn with_encryption_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.encryption_algorithm = algorithm;
        self
    }

    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Whether the file is stored encrypted
    pub fn is_encrypted(&self) -> bool {
        self.encryption_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.dir, None);
        assert_eq!(config.file_name, "settings.json");
        assert!(config.atomic_save);
        assert!(!config.prettify);
        assert_eq!(config.num_spaces, 2);
        assert_eq!(config.encryption_algorithm, Algorithm::Aes256Cbc);
        assert!(!config.is_encrypted());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"prettify": true, "encryption_key": "k"}"#).unwrap();
        assert!(config.prettify);
        assert_eq!(config.num_spaces, 2);
        assert!(config.atomic_save);
        assert_eq!(config.file_name, "settings.json");
        assert_eq!(config.encryption_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_algorithm_by_name() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"encryption_algorithm": "chacha20-poly1305"}"#).unwrap();
        assert_eq!(config.encryption_algorithm, Algorithm::ChaCha20Poly1305);

        let result = serde_json::from_str::<StoreConfig>(r#"{"encryption_algorithm": "rot13"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::default()
            .with_dir("/tmp/app")
            .with_file_name("prefs.json")
            .with_atomic_save(false)
            .with_prettify(true)
            .with_num_spaces(4)
            .with_encryption_key("secret");
        assert_eq!(config.dir, Some(PathBuf::from("/tmp/app")));
        assert_eq!(config.file_name, "prefs.json");
        assert!(!config.atomic_save);
        assert_eq!(config.num_spaces, 4);
        assert!(config.is_encrypted());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = StoreConfig::default().with_encryption_key("hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"file_name": "other.json", "num_spaces": 8}"#).unwrap();

        let config = StoreConfig::load_from(&path).unwrap();
        assert_eq!(config.file_name, "other.json");
        assert_eq!(config.num_spaces, 8);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let result = StoreConfig::load_from(&path);
        assert!(matches!(result, Err(SettingsError::ConfigParse(_))));
    }
}
