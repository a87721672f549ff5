// Smart Bookmark Settings Engine
// Loads, saves and resets client settings.
// Settings are stored as a JSON file at the platform-specific config path;
// backend credentials may be overridden from the environment.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ClientSettings;

pub const ENV_BACKEND_URL: &str = "SMART_BOOKMARK_BACKEND_URL";
pub const ENV_ANON_KEY: &str = "SMART_BOOKMARK_ANON_KEY";
pub const ENV_REDIRECT_URL: &str = "SMART_BOOKMARK_REDIRECT_URL";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ClientSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ClientSettings;
    fn update(&mut self, settings: ClientSettings) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ClientSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: ClientSettings::default(),
        }
    }

    /// Loads from disk, then applies overrides from the process environment.
    pub fn load_with_env(&mut self) -> Result<ClientSettings, SettingsError> {
        self.load()?;
        apply_env_overrides(&mut self.settings, |key| std::env::var(key).ok());
        validate(&self.settings)?;
        Ok(self.settings.clone())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<ClientSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "no settings file, using defaults");
            self.settings = ClientSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: ClientSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        validate(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Validates, replaces and immediately persists the settings.
    fn update(&mut self, settings: ClientSettings) -> Result<(), SettingsError> {
        validate(&settings)?;
        self.settings = settings;
        self.save()
    }

    /// Resets all settings to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ClientSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

/// Overlays backend credentials and the redirect URL from `lookup`.
///
/// Blank values are ignored so an exported-but-empty variable does not wipe
/// the file's value.
pub fn apply_env_overrides<F>(settings: &mut ClientSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_BACKEND_URL) {
        info!("{ENV_BACKEND_URL} set, overriding backend url");
        settings.backend.url = url;
    }
    if let Some(key) = get(ENV_ANON_KEY) {
        info!("{ENV_ANON_KEY} set, overriding anon key");
        settings.backend.anon_key = key;
    }
    if let Some(redirect) = get(ENV_REDIRECT_URL) {
        info!("{ENV_REDIRECT_URL} set, overriding redirect url");
        settings.auth.redirect_url = redirect;
    }
}

fn validate(settings: &ClientSettings) -> Result<(), SettingsError> {
    let backend_url = settings.backend.url.trim();
    if !backend_url.is_empty() {
        url::Url::parse(backend_url).map_err(|e| {
            SettingsError::InvalidValue(format!("backend.url '{}': {}", backend_url, e))
        })?;
    }
    if settings.backend.table.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "backend.table must not be empty".to_string(),
        ));
    }
    if settings.display.highlight_ms == 0 {
        return Err(SettingsError::InvalidValue(
            "display.highlight_ms must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
