// Smart Bookmark platform paths for macOS
// Config: ~/Library/Application Support/Smart Bookmark
// Data:   ~/Library/Application Support/Smart Bookmark

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `~/Library/Application Support/Smart Bookmark`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("Smart Bookmark")
}

/// Same as the config directory on macOS.
pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}
