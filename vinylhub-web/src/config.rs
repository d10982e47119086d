//! Configuration resolution for vinylhub-web
//!
//! Bootstrap settings (port, data folder, logging) come from the command
//! line, environment variables, and an optional TOML file. Spotify
//! credentials add a database tier on top, so a deployment can be
//! re-pointed at another Spotify application without touching the
//! filesystem.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (--port, --data-folder)
//! 2. Environment variables (VINYLHUB_*)
//! 3. TOML configuration file
//! 4. Database settings table (credentials: highest priority instead)
//! 5. Built-in defaults (code constants)

use clap::Parser;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vinylhub_common::{Error, Result};

/// Default HTTP port when neither CLI, environment, nor TOML set one
pub const DEFAULT_PORT: u16 = 8000;

/// Command-line arguments for vinylhub-web
#[derive(Parser, Debug)]
#[command(name = "vinylhub-web")]
#[command(about = "VinylHub vinyl record collection server")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "VINYLHUB_PORT")]
    pub port: Option<u16>,

    /// Data folder holding the SQLite database
    #[arg(short, long, env = "VINYLHUB_DATA_FOLDER")]
    pub data_folder: Option<String>,

    /// Path to the TOML config file (default: platform config location)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Bootstrap configuration loaded from the TOML file
///
/// Every field is optional; the file only needs the keys a deployment
/// actually overrides. Changes require a restart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Data folder holding the SQLite database
    #[serde(default)]
    pub data_folder: Option<String>,

    /// Spotify application credentials
    #[serde(default)]
    pub spotify: SpotifySection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[spotify]` section of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifySection {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

/// `[logging]` section of the TOML file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load the TOML config file
///
/// An explicit path must exist and parse. Without one, the platform
/// config location is tried and a missing file simply yields defaults.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match vinylhub_common::config::find_config_file() {
            Ok(path) => path,
            Err(_) => return Ok(TomlConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

    info!("Loaded TOML configuration from {:?}", path);
    Ok(config)
}

/// Resolve the HTTP port
///
/// Priority: command line / environment (merged by clap), then TOML,
/// then [`DEFAULT_PORT`].
pub fn resolve_port(cli_arg: Option<u16>, toml_config: &TomlConfig) -> u16 {
    cli_arg.or(toml_config.port).unwrap_or(DEFAULT_PORT)
}

/// Resolve the data folder
///
/// Priority: command line / environment (merged by clap), then TOML,
/// then the OS-dependent compiled default.
pub fn resolve_data_folder(cli_arg: Option<&str>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Some(path) = &toml_config.data_folder {
        return PathBuf::from(path);
    }

    vinylhub_common::config::get_default_data_folder()
}

// ============================================================================
// Spotify Credential Resolution
// ============================================================================

/// Spotify application credentials, resolved once at startup
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Names and lookup keys for one credential
struct CredentialKeys {
    /// Human-readable name for log and error messages
    name: &'static str,
    /// Key in the database settings table
    setting: &'static str,
    /// Environment variable
    env: &'static str,
    /// Key in the TOML `[spotify]` section
    toml: &'static str,
}

const CLIENT_ID_KEYS: CredentialKeys = CredentialKeys {
    name: "Spotify client ID",
    setting: "spotify_client_id",
    env: "VINYLHUB_SPOTIFY_CLIENT_ID",
    toml: "client_id",
};

const CLIENT_SECRET_KEYS: CredentialKeys = CredentialKeys {
    name: "Spotify client secret",
    setting: "spotify_client_secret",
    env: "VINYLHUB_SPOTIFY_CLIENT_SECRET",
    toml: "client_secret",
};

const REDIRECT_URI_KEYS: CredentialKeys = CredentialKeys {
    name: "Spotify redirect URI",
    setting: "spotify_redirect_uri",
    env: "VINYLHUB_SPOTIFY_REDIRECT_URI",
    toml: "redirect_uri",
};

/// Resolve all Spotify credentials from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_spotify_credentials(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
) -> Result<SpotifyCredentials> {
    let client_id = resolve_credential(
        &CLIENT_ID_KEYS,
        crate::db::settings::get_spotify_client_id(db).await?,
        toml_config.spotify.client_id.as_ref(),
    )?;

    let client_secret = resolve_credential(
        &CLIENT_SECRET_KEYS,
        crate::db::settings::get_spotify_client_secret(db).await?,
        toml_config.spotify.client_secret.as_ref(),
    )?;

    let redirect_uri = resolve_credential(
        &REDIRECT_URI_KEYS,
        crate::db::settings::get_spotify_redirect_uri(db).await?,
        toml_config.spotify.redirect_uri.as_ref(),
    )?;

    Ok(SpotifyCredentials {
        client_id,
        client_secret,
        redirect_uri,
    })
}

/// Resolve one credential with Database → ENV → TOML priority
fn resolve_credential(
    keys: &CredentialKeys,
    db_value: Option<String>,
    toml_value: Option<&String>,
) -> Result<String> {
    let mut sources = Vec::new();

    // Tier 1: Database (authoritative)
    if let Some(value) = &db_value {
        if is_valid_value(value) {
            sources.push("database");
        }
    }

    // Tier 2: Environment variable
    let env_value = std::env::var(keys.env).ok();
    if let Some(value) = &env_value {
        if is_valid_value(value) {
            sources.push("environment");
        }
    }

    // Tier 3: TOML config
    if let Some(value) = toml_value {
        if is_valid_value(value) {
            sources.push("TOML");
        }
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "{} found in multiple sources: {}. Using database (highest priority).",
            keys.name,
            sources.join(", ")
        );
    }

    // Resolution priority
    if let Some(value) = db_value {
        if is_valid_value(&value) {
            info!("{} loaded from database", keys.name);
            return Ok(value);
        }
    }

    if let Some(value) = env_value {
        if is_valid_value(&value) {
            info!("{} loaded from environment variable", keys.name);
            return Ok(value);
        }
    }

    if let Some(value) = toml_value {
        if is_valid_value(value) {
            info!("{} loaded from TOML config", keys.name);
            return Ok(value.clone());
        }
    }

    // No valid value found
    Err(Error::Config(format!(
        "{} not configured. Please configure using one of:\n\
         1. Settings table: INSERT INTO settings (key, value) VALUES ('{}', 'your-value')\n\
         2. Environment: {}=your-value\n\
         3. TOML config: ~/.config/vinylhub/vinylhub.toml ([spotify] {} = \"your-value\")\n\
         \n\
         Register the application at: https://developer.spotify.com/dashboard",
        keys.name, keys.setting, keys.env, keys.toml
    )))
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config_parses_full_document() {
        let config: TomlConfig = toml::from_str(
            r#"
            port = 9000
            data_folder = "/srv/vinylhub"

            [spotify]
            client_id = "abc123"
            client_secret = "shh"
            redirect_uri = "http://127.0.0.1:8000/auth/callback"

            [logging]
            level = "warn"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, Some(9000));
        assert_eq!(config.data_folder, Some("/srv/vinylhub".to_string()));
        assert_eq!(config.spotify.client_id, Some("abc123".to_string()));
        assert_eq!(config.spotify.client_secret, Some("shh".to_string()));
        assert_eq!(
            config.spotify.redirect_uri,
            Some("http://127.0.0.1:8000/auth/callback".to_string())
        );
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_toml_config_empty_document_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();

        assert_eq!(config.port, None);
        assert_eq!(config.data_folder, None);
        assert_eq!(config.spotify.client_id, None);
        assert_eq!(config.spotify.client_secret, None);
        assert_eq!(config.spotify.redirect_uri, None);
    }

    #[test]
    fn test_logging_section_defaults_level_to_info() {
        let config: TomlConfig = toml::from_str("[logging]\n").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_resolve_port_priority() {
        let toml_config = TomlConfig {
            port: Some(9000),
            ..Default::default()
        };

        assert_eq!(resolve_port(Some(7777), &toml_config), 7777);
        assert_eq!(resolve_port(None, &toml_config), 9000);
        assert_eq!(resolve_port(None, &TomlConfig::default()), DEFAULT_PORT);
        assert_eq!(DEFAULT_PORT, 8000);
    }

    #[test]
    fn test_resolve_data_folder_priority() {
        let toml_config = TomlConfig {
            data_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolve_data_folder(Some("/from/cli"), &toml_config),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            resolve_data_folder(None, &toml_config),
            PathBuf::from("/from/toml")
        );

        // Without CLI or TOML the compiled platform default applies
        let fallback = resolve_data_folder(None, &TomlConfig::default());
        assert!(!fallback.as_os_str().is_empty());
    }

    #[test]
    fn test_load_toml_config_missing_explicit_path_errors() {
        let result = load_toml_config(Some(Path::new("/nonexistent/vinylhub.toml")));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_load_toml_config_reads_explicit_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vinylhub.toml");
        std::fs::write(&path, "port = 8123\n").unwrap();

        let config = load_toml_config(Some(&path)).unwrap();
        assert_eq!(config.port, Some(8123));
    }

    #[test]
    fn test_load_toml_config_rejects_bad_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vinylhub.toml");
        std::fs::write(&path, "port = \"not a number").unwrap();

        let result = load_toml_config(Some(&path));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn test_empty_value_rejected() {
        assert!(!is_valid_value(""));
        assert!(!is_valid_value("   \t\n"));
        assert!(is_valid_value("valid-value-123"));
    }
}
