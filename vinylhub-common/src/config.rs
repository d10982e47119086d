//! Config file and data folder locations

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the SQLite database file inside the data folder
pub const DATABASE_FILE: &str = "vinylhub.db";

/// Get default configuration file path for the platform
pub fn find_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/vinylhub/vinylhub.toml first, then /etc/vinylhub/vinylhub.toml
        let user_config = dirs::config_dir().map(|d| d.join("vinylhub").join("vinylhub.toml"));
        let system_config = PathBuf::from("/etc/vinylhub/vinylhub.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else if cfg!(target_os = "macos") || cfg!(target_os = "windows") {
        dirs::config_dir()
            .map(|d| d.join("vinylhub").join("vinylhub.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    } else {
        return Err(Error::Config("Unsupported platform".to_string()));
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default data folder path
pub fn get_default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/vinylhub (or /var/lib/vinylhub for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("vinylhub"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/vinylhub"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/vinylhub
        dirs::data_dir()
            .map(|d| d.join("vinylhub"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/vinylhub"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\vinylhub
        dirs::data_local_dir()
            .map(|d| d.join("vinylhub"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\vinylhub"))
    } else {
        PathBuf::from("./vinylhub_data")
    }
}

/// Create the data folder if it does not exist yet
pub fn ensure_data_folder(data_folder: &Path) -> Result<()> {
    if !data_folder.exists() {
        std::fs::create_dir_all(data_folder)?;
    }
    Ok(())
}

/// Path of the SQLite database inside the data folder
pub fn database_path(data_folder: &Path) -> PathBuf {
    data_folder.join(DATABASE_FILE)
}
