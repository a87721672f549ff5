// Smart Bookmark platform paths for Linux
// Config: ~/.config/smart-bookmark
// Data:   ~/.local/share/smart-bookmark

use std::env;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "smart-bookmark";

/// Picks `$XDG_*_HOME/smart-bookmark` when set and non-empty, else `$HOME/<fallback>/smart-bookmark`.
fn resolve(xdg: Option<String>, home: Option<String>, fallback: &Path) -> PathBuf {
    match xdg.filter(|v| !v.is_empty()) {
        Some(base) => PathBuf::from(base).join(APP_DIR),
        None => PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
            .join(fallback)
            .join(APP_DIR),
    }
}

/// Returns the configuration directory on Linux.
pub fn get_config_dir() -> PathBuf {
    resolve(
        env::var("XDG_CONFIG_HOME").ok(),
        env::var("HOME").ok(),
        Path::new(".config"),
    )
}

/// Returns the data directory on Linux.
pub fn get_data_dir() -> PathBuf {
    resolve(
        env::var("XDG_DATA_HOME").ok(),
        env::var("HOME").ok(),
        &Path::new(".local").join("share"),
    )
}
