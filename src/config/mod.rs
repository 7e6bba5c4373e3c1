//! Configuration module
//!
//! Handles persisted application settings

mod settings;

pub use settings::AppConfig;

use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the application configuration directory
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "serimon", "Serimon").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Initialize the application configuration directory
pub fn init_directories() -> std::io::Result<()> {
    if let Some(dir) = config_dir() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}
