//! Application configuration
//!
//! Re-exports the shared settings types and adds confy-backed persistence.

use std::path::{Path, PathBuf};

pub use lucky_draw_types::{AnnouncementSettings, AppConfig, AudioSettings, DrawSettings};

use super::error::ConfigError;

const APP_NAME: &str = "lucky-draw";
const CONFIG_NAME: &str = "config";

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    /// Load from the platform config dir, creating the file with defaults if missing
    fn load() -> Result<Self, ConfigError>;
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    /// Write back to the platform config dir
    fn save(&self) -> Result<(), ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(confy::load_path(path)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = scratch_dir("config_defaults");
        let path = dir.join("config.toml");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_saved_settings_are_read_back() {
        let dir = scratch_dir("config_round_trip");
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.clear_winners_on_start = false;
        config.draw.stop_delay_ms = 4500;
        config.announcement.locale = "vi".into();
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_saving_fills_in_missing_keys() {
        let dir = scratch_dir("config_fill_keys");
        let path = dir.join("config.toml");
        std::fs::write(&path, "winners_file = \"draws.json\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.winners_file, PathBuf::from("draws.json"));
        config.save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("stop_delay_ms"), "{written}");
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }
}
