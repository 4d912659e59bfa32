//! Application configuration management.
//!
//! This module handles loading and saving the configuration, which covers the
//! remote feed endpoint, the image base URL, and an optional override for the
//! database location.
//!
//! Configuration is stored at `~/.config/menucache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "menucache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Database file name under the cache directory
const DB_FILE: &str = "menu.db";

fn default_menu_url() -> String {
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/menu.json".to_string()
}

fn default_image_base_url() -> String {
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/images".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_menu_url")]
    pub menu_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Overrides the default location under the user cache directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            menu_url: default_menu_url(),
            image_base_url: default_image_base_url(),
            database_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the menu database lives: the configured override, or
    /// `<cache dir>/menucache/menu.db`.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.database_path {
            return Ok(path.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(DB_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gets_defaults() {
        let config: Config = serde_json::from_str("{}").expect("parse failed");
        assert_eq!(config.menu_url, default_menu_url());
        assert_eq!(config.image_base_url, default_image_base_url());
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_partial_document_keeps_overrides() {
        let config: Config =
            serde_json::from_str(r#"{"menu_url": "https://feed.test/menu.json"}"#)
                .expect("parse failed");
        assert_eq!(config.menu_url, "https://feed.test/menu.json");
        assert_eq!(config.image_base_url, default_image_base_url());
    }

    #[test]
    fn test_database_path_override() {
        let config = Config {
            database_path: Some(PathBuf::from("/tmp/custom.db")),
            ..Config::default()
        };
        assert_eq!(
            config.database_path().expect("path failed"),
            PathBuf::from("/tmp/custom.db")
        );
    }
}
