//! The settings store: file bootstrap, load/save and key-path operations

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use settingscraft_core::{self as accessor, KeyPath, KeyPathSpec};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::codec::Codec;
use crate::error::storage;
use crate::paths::{default_data_dir, temp_path_for};
use crate::{Result, SettingsError, StoreConfig};

/// A JSON settings file addressed by key path
///
/// Every operation loads the whole document from disk, applies the change and
/// (for mutations) writes it back. Methods ending in `_sync` block on
/// `std::fs`; the others are async over `tokio::fs`. Both behave identically.
#[derive(Clone)]
pub struct Store {
    config: StoreConfig,
    codec: Codec,
    dir: PathBuf,
    file: PathBuf,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("file", &self.file)
            .field("config", &self.config)
            .finish()
    }
}

impl Store {
    /// Create a store, resolving the default directory from the platform
    pub fn new(config: StoreConfig) -> Result<Self> {
        Self::with_resolver(config, default_data_dir)
    }

    /// Create a store with a custom directory resolver
    ///
    /// `resolve_dir` is only consulted when `config.dir` is unset. Relative
    /// directories are made absolute against the current directory.
    pub fn with_resolver<F>(config: StoreConfig, resolve_dir: F) -> Result<Self>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let dir = match &config.dir {
            Some(dir) => dir.clone(),
            None => resolve_dir().ok_or(SettingsError::NoDataDir)?,
        };
        let dir = if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir()
                .map_err(storage("resolve", &dir))?
                .join(dir)
        };
        let file = dir.join(&config.file_name);
        let codec = Codec::new(&config);

        Ok(Self {
            config,
            codec,
            dir,
            file,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Absolute path of the settings file
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Directory containing the settings file
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ==================== BLOCKING API ====================

    /// The whole document
    pub fn get_all_sync(&self) -> Result<Value> {
        self.load_sync()
    }

    /// Value at `key_path`, or `None` if absent
    pub fn get_sync(&self, key_path: impl Into<KeyPathSpec>) -> Result<Option<Value>> {
        let path = KeyPath::normalize(key_path)?;
        let document = self.load_sync()?;
        Ok(take_at(document, &path))
    }

    /// Whether a value (including `null`) exists at `key_path`
    pub fn has_sync(&self, key_path: impl Into<KeyPathSpec>) -> Result<bool> {
        let path = KeyPath::normalize(key_path)?;
        let document = self.load_sync()?;
        Ok(accessor::has(&document, &path))
    }

    /// Set the value at `key_path`, creating intermediate objects
    pub fn set_sync(&self, key_path: impl Into<KeyPathSpec>, value: impl Into<Value>) -> Result<()> {
        let path = KeyPath::normalize(key_path)?;
        let mut document = self.load_sync()?;
        accessor::set(&mut document, &path, value.into());
        self.save_sync(&document)
    }

    /// Replace the whole document
    pub fn set_all_sync(&self, value: impl Into<Value>) -> Result<()> {
        self.save_sync(&value.into())
    }

    /// Remove the value at `key_path`; absent paths are a no-op
    pub fn delete_sync(&self, key_path: impl Into<KeyPathSpec>) -> Result<()> {
        let path = KeyPath::normalize(key_path)?;
        let mut document = self.load_sync()?;
        accessor::delete(&mut document, &path);
        self.save_sync(&document)
    }

    /// Reset the document to `{}`
    pub fn clear_sync(&self) -> Result<()> {
        self.save_sync(&empty_document())
    }

    fn ensure_dir_sync(&self) -> Result<()> {
        match std::fs::metadata(&self.dir) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                std::fs::create_dir_all(&self.dir).map_err(storage("create directory", &self.dir))?;
                debug!("Created settings directory {:?}", self.dir);
                Ok(())
            }
            Err(e) => Err(storage("stat", &self.dir)(e)),
        }
    }

    fn ensure_file_sync(&self) -> Result<()> {
        match std::fs::metadata(&self.file) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.save_sync(&empty_document())?;
                info!("Created settings file {:?}", self.file);
                Ok(())
            }
            Err(e) => Err(storage("stat", &self.file)(e)),
        }
    }

    fn load_sync(&self) -> Result<Value> {
        self.ensure_file_sync()?;
        let bytes = std::fs::read(&self.file).map_err(storage("read", &self.file))?;
        let document = self.codec.decode(&bytes)?;
        debug!("Loaded settings from {:?}", self.file);
        Ok(document)
    }

    fn save_sync(&self, document: &Value) -> Result<()> {
        let bytes = self.codec.encode(document)?;
        self.ensure_dir_sync()?;

        if self.config.atomic_save {
            let temp = temp_path_for(&self.file);
            if let Err(e) = write_and_rename_sync(&temp, &self.file, &bytes) {
                let _ = std::fs::remove_file(&temp);
                return Err(storage("write", &self.file)(e));
            }
        } else {
            std::fs::write(&self.file, &bytes).map_err(storage("write", &self.file))?;
        }

        debug!("Saved settings to {:?}", self.file);
        Ok(())
    }

    // ==================== ASYNC API ====================

    /// The whole document
    pub async fn get_all(&self) -> Result<Value> {
        self.load().await
    }

    /// Value at `key_path`, or `None` if absent
    pub async fn get(&self, key_path: impl Into<KeyPathSpec>) -> Result<Option<Value>> {
        let path = KeyPath::normalize(key_path)?;
        let document = self.load().await?;
        Ok(take_at(document, &path))
    }

    /// Whether a value (including `null`) exists at `key_path`
    pub async fn has(&self, key_path: impl Into<KeyPathSpec>) -> Result<bool> {
        let path = KeyPath::normalize(key_path)?;
        let document = self.load().await?;
        Ok(accessor::has(&document, &path))
    }

    /// Set the value at `key_path`, creating intermediate objects
    pub async fn set(&self, key_path: impl Into<KeyPathSpec>, value: impl Into<Value>) -> Result<()> {
        let path = KeyPath::normalize(key_path)?;
        let value = value.into();
        let mut document = self.load().await?;
        accessor::set(&mut document, &path, value);
        self.save(&document).await
    }

    /// Replace the whole document
    pub async fn set_all(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.save(&value).await
    }

    /// Remove the value at `key_path`; absent paths are a no-op
    pub async fn delete(&self, key_path: impl Into<KeyPathSpec>) -> Result<()> {
        let path = KeyPath::normalize(key_path)?;
        let mut document = self.load().await?;
        accessor::delete(&mut document, &path);
        self.save(&document).await
    }

    /// Reset the document to `{}`
    pub async fn clear(&self) -> Result<()> {
        self.save(&empty_document()).await
    }

    async fn ensure_dir(&self) -> Result<()> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tokio::fs::create_dir_all(&self.dir)
                    .await
                    .map_err(storage("create directory", &self.dir))?;
                debug!("Created settings directory {:?}", self.dir);
                Ok(())
            }
            Err(e) => Err(storage("stat", &self.dir)(e)),
        }
    }

    async fn ensure_file(&self) -> Result<()> {
        match tokio::fs::metadata(&self.file).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.save(&empty_document()).await?;
                info!("Created settings file {:?}", self.file);
                Ok(())
            }
            Err(e) => Err(storage("stat", &self.file)(e)),
        }
    }

    async fn load(&self) -> Result<Value> {
        self.ensure_file().await?;
        let bytes = tokio::fs::read(&self.file)
            .await
            .map_err(storage("read", &self.file))?;
        let document = self.codec.decode(&bytes)?;
        debug!("Loaded settings from {:?}", self.file);
        Ok(document)
    }

    async fn save(&self, document: &Value) -> Result<()> {
        let bytes = self.codec.encode(document)?;
        self.ensure_dir().await?;

        if self.config.atomic_save {
            let temp = temp_path_for(&self.file);
            if let Err(e) = write_and_rename(&temp, &self.file, &bytes).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(storage("write", &self.file)(e));
            }
        } else {
            tokio::fs::write(&self.file, &bytes)
                .await
                .map_err(storage("write", &self.file))?;
        }

        debug!("Saved settings to {:?}", self.file);
        Ok(())
    }
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}

fn take_at(mut document: Value, path: &KeyPath) -> Option<Value> {
    accessor::get_mut(&mut document, path).map(Value::take)
}

/// Write `bytes` to `temp`, then move it over `target`
///
/// The temp file takes the permissions of an existing target file.
fn write_and_rename_sync(temp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = std::fs::File::create(temp)?;
    if let Some(existing) = std::fs::metadata(target).ok().filter(|m| m.is_file()) {
        file.set_permissions(existing.permissions())?;
    }
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(temp, target)
}

async fn write_and_rename(temp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(temp).await?;
    if let Some(existing) = tokio::fs::metadata(target).await.ok().filter(|m| m.is_file()) {
        file.set_permissions(existing.permissions()).await?;
    }
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(temp, target).await
}
