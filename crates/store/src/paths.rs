//! Path utilities

use std::path::{Path, PathBuf};

use rand::RngCore;

/// Directory name under the platform data directory
pub const APP_DIR_NAME: &str = "settingscraft";

/// Default settings file name
pub const DEFAULT_FILE_NAME: &str = "settings.json";

/// Per-application user data directory
///
/// `~/.config/<app>` on Linux, `~/Library/Application Support/<app>` on macOS,
/// `%APPDATA%\<app>` on Windows.
pub fn user_data_dir(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(app_name))
}

/// User data directory for SettingsCraft itself
pub fn default_data_dir() -> Option<PathBuf> {
    user_data_dir(APP_DIR_NAME)
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Unique sibling path used for atomic writes of `target`
pub(crate) fn temp_path_for(target: &Path) -> PathBuf {
    let mut suffix = [0u8; 6];
    rand::thread_rng().fill_bytes(&mut suffix);

    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    target.with_file_name(format!(".{}.{}.tmp", name, hex::encode(suffix)))
}
