// Smart Bookmark platform paths for Windows
// Config: %APPDATA%/Smart Bookmark
// Data:   %LOCALAPPDATA%/Smart Bookmark

use std::env;
use std::path::PathBuf;

/// `%APPDATA%/Smart Bookmark`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("Smart Bookmark")
}

/// `%LOCALAPPDATA%/Smart Bookmark`; the auth session stays on this machine.
pub fn get_data_dir() -> PathBuf {
    let local_appdata = env::var("LOCALAPPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Local"));
    PathBuf::from(local_appdata).join("Smart Bookmark")
}
