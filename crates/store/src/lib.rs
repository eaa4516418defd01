//! SettingsCraft Store
//!
//! Persists a single JSON document and reads/writes fields in it by key path.
//!
//! ## Features
//!
//! - Dotted key paths with `\.` escapes, or nested lists of key paths
//! - Lazy creation of the settings directory and file
//! - Atomic saves (temp file + rename)
//! - Optional pretty-printing and at-rest encryption
//! - Blocking (`*_sync`) and async (tokio) variants of every operation
//!
//! Each operation re-reads the file; nothing is cached between calls and no
//! locking is done, so concurrent writers race and the last save wins.
//!
//! ## Usage
//!
//! ```no_run
//! use serde_json::json;
//! use settingscraft_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::default().with_prettify(true))?;
//!
//! store.set_sync("window.bounds", json!({"width": 800, "height": 600}))?;
//! assert!(store.has_sync("window.bounds.width")?);
//!
//! store.delete_sync(["window", "bounds", "height"])?;
//! let width = store.get_sync("window.bounds.width")?;
//! assert_eq!(width, Some(json!(800)));
//! # Ok::<(), settingscraft_store::SettingsError>(())
//! ```

mod codec;
mod config;
mod error;
mod paths;
mod store;

pub use codec::Codec;
pub use config::StoreConfig;
pub use error::{CodecError, Result, SettingsError};
pub use paths::{default_data_dir, expand_path, user_data_dir, APP_DIR_NAME, DEFAULT_FILE_NAME};
pub use store::Store;

pub use settingscraft_core::{KeyPath, KeyPathError, KeyPathSpec};
pub use settingscraft_crypto::Algorithm;
