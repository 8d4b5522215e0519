//! Device settings
//!
//! Operator-adjustable settings stored in `settings.json`. Every field has a
//! serde default so files written by older firmware still load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hardware::SystemClock;
use crate::sampler::{SamplerConfig, SamplerConfigError};
use crate::storage::{Storage, StorageError};
use crate::units::TempUnits;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Errors loading or saving settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Malformed settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid sampler settings: {0}")]
    Sampler(#[from] SamplerConfigError),
}

/// Device configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Access point name for the on-device web server
    #[serde(default = "default_ssid")]
    pub ssid: String,

    /// Access point password
    #[serde(default = "default_password")]
    pub password: String,

    /// Display rotation (0-3, quarter turns)
    #[serde(default = "default_screen_rotation")]
    pub screen_rotation: u8,

    /// Units readings are taken and shown in
    #[serde(default)]
    pub temp_units: TempUnits,

    /// Show times on a 12-hour clock
    #[serde(default = "default_twelve_hour")]
    pub twelve_hour: bool,

    /// Display font size in points
    #[serde(default = "default_font_points")]
    pub font_points: u8,

    /// Stabilization parameters
    #[serde(default)]
    pub sampler: SamplerConfig,
}

fn default_ssid() -> String {
    "Yamura-Pyrometer".to_string()
}

fn default_password() -> String {
    "pyrometer".to_string()
}

fn default_screen_rotation() -> u8 {
    1
}

fn default_twelve_hour() -> bool {
    true
}

fn default_font_points() -> u8 {
    12
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            ssid: default_ssid(),
            password: default_password(),
            screen_rotation: default_screen_rotation(),
            temp_units: TempUnits::default(),
            twelve_hour: default_twelve_hour(),
            font_points: default_font_points(),
            sampler: SamplerConfig::default(),
        }
    }
}

impl DeviceSettings {
    /// Load settings from storage
    pub fn load(storage: &dyn Storage) -> Result<Self, SettingsError> {
        let content = storage.read_lines(SETTINGS_FILE)?.join("\n");
        let settings: DeviceSettings = serde_json::from_str(&content)?;
        settings.sampler.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when no file exists
    pub fn load_or_default(storage: &dyn Storage) -> Result<Self, SettingsError> {
        if storage.exists(SETTINGS_FILE) {
            Self::load(storage)
        } else {
            tracing::debug!("No {} found, using default settings", SETTINGS_FILE);
            Ok(Self::default())
        }
    }

    /// Save settings to storage
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), SettingsError> {
        self.sampler.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        storage.write(SETTINGS_FILE, &content)?;
        Ok(())
    }

    /// Clock matching the configured hour format
    pub fn clock(&self) -> SystemClock {
        SystemClock::new(self.twelve_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_missing_file_gives_defaults() {
        let storage = MemoryStorage::new();
        let settings = DeviceSettings::load_or_default(&storage).unwrap();
        assert_eq!(settings, DeviceSettings::default());
        assert_eq!(settings.temp_units, TempUnits::Fahrenheit);
        assert_eq!(settings.sampler.window_size, 15);
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        let mut settings = DeviceSettings::default();
        settings.temp_units = TempUnits::Celsius;
        settings.sampler.window_size = 10;
        settings.save(&mut storage).unwrap();

        let loaded = DeviceSettings::load(&storage).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .write(SETTINGS_FILE, r#"{ "temp_units": "celsius", "sampler": { "window_size": 10 } }"#)
            .unwrap();

        let settings = DeviceSettings::load(&storage).unwrap();
        assert_eq!(settings.temp_units, TempUnits::Celsius);
        assert_eq!(settings.sampler.window_size, 10);
        assert_eq!(settings.sampler.deviation_band, 0.25);
        assert_eq!(settings.ssid, "Yamura-Pyrometer");
    }

    #[test]
    fn test_invalid_sampler_rejected() {
        let mut storage = MemoryStorage::new();
        storage
            .write(SETTINGS_FILE, r#"{ "sampler": { "window_size": 0 } }"#)
            .unwrap();
        assert!(matches!(
            DeviceSettings::load(&storage),
            Err(SettingsError::Sampler(SamplerConfigError::EmptyWindow))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let mut storage = MemoryStorage::new();
        storage.write(SETTINGS_FILE, "{ not json").unwrap();
        assert!(matches!(
            DeviceSettings::load(&storage),
            Err(SettingsError::Json(_))
        ));
    }
}
