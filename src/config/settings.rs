//! Application settings

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persisted application configuration.
///
/// Command-line flags override these values; these values override the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port to use when none is given on the command line
    pub default_port: Option<String>,
    /// Baud rate used when none is given on the command line
    pub default_baud: u32,
    /// Display window size used when none is given on the command line
    pub default_window: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_port: None,
            default_baud: 9600,
            default_window: 100,
        }
    }
}

impl AppConfig {
    /// Load config from the platform config directory
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = super::config_dir()
            .ok_or("Could not determine config directory")?
            .join("config.toml");
        Self::load_from(&config_path)
    }

    /// Load config from a specific path.
    ///
    /// A missing file yields the defaults, never an error.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the platform config directory
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        super::init_directories()?;
        let config_path = super::config_dir()
            .ok_or("Could not determine config directory")?
            .join("config.toml");
        self.save_to(&config_path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig {
            default_port: Some("/dev/ttyUSB0".to_string()),
            default_baud: 115_200,
            default_window: 250,
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_baud = 57600\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.default_baud, 57_600);
        assert_eq!(loaded.default_window, 100);
        assert_eq!(loaded.default_port, None);
    }
}
