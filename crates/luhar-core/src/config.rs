use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::LuharError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "LUHAR_TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub images: ImagesConfig,
    pub admin: AdminConfig,
    pub share: ShareConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    pub base_url: String,
    pub placeholder_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub base_url: String,
    /// Cookie header forwarded to the admin backend, e.g. `session_id=...`.
    pub session_cookie: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    pub site_origin: String,
    pub site_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie jar holding the `username` marker. Defaults to the data dir.
    pub cookie_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub max_visible_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub file: bool,
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults,
    /// then environment overrides.
    pub fn load() -> Result<Self, LuharError> {
        let user_path = Self::config_path();
        let mut config = if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)?;
            Self::from_toml(&user_str)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse a config file layered over the built-in defaults. Keys missing
    /// from it keep their default values.
    pub fn from_toml(s: &str) -> Result<Self, LuharError> {
        let mut merged: toml::Table = DEFAULT_CONFIG
            .parse()
            .map_err(|e: toml::de::Error| LuharError::Config(e.to_string()))?;
        let user: toml::Table = s
            .parse()
            .map_err(|e: toml::de::Error| LuharError::Config(e.to_string()))?;
        merge_tables(&mut merged, user);
        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| LuharError::Config(e.to_string()))
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.api.api_key = key;
            }
        }
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the database file.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("luhar.db"))
            .unwrap_or_else(|| PathBuf::from("luhar.db"))
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path() -> Result<PathBuf, LuharError> {
        let path = Self::db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Cookie jar holding the session marker.
    pub fn session_path(&self) -> PathBuf {
        self.session.cookie_file.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|d| d.data_dir().join("session"))
                .unwrap_or_else(|| PathBuf::from("session"))
        })
    }

    /// Directory for log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "luhar")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Recursively overlay `overlay` onto `base`. Tables merge, everything else
/// replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                    continue;
                }
                base.insert(key, toml::Value::Table(incoming));
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.ui.max_visible_pages, 5);
        assert_eq!(config.share.site_name, "LUHAR");
        assert!(config.session.cookie_file.is_none());
        assert!(!config.logging.file);
    }

    #[test]
    fn test_partial_user_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            api_key = "k"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.api_key, "k");
        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.images.base_url, "https://image.tmdb.org/t/p");
        assert_eq!(config.admin.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::from_toml(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[api").unwrap_err();
        assert!(matches!(err, LuharError::Config(_)));
    }
}
