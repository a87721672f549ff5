// Smart Bookmark platform abstraction
// Provides platform-specific config and data directories.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory (holds `settings.json`).
///
/// - **Linux**: `~/.config/smart-bookmark` (or `$XDG_CONFIG_HOME/smart-bookmark`)
/// - **macOS**: `~/Library/Application Support/Smart Bookmark`
/// - **Windows**: `%APPDATA%/Smart Bookmark`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory (holds the auth session).
///
/// - **Linux**: `~/.local/share/smart-bookmark` (or `$XDG_DATA_HOME/smart-bookmark`)
/// - **macOS**: `~/Library/Application Support/Smart Bookmark`
/// - **Windows**: `%LOCALAPPDATA%/Smart Bookmark`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
