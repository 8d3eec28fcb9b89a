//! Application configuration
//!
//! Read once at startup from `<config dir>/tour-viewer/config.json`.
//! Every field has a default, so a missing file (or a partial one) is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data::VirtualTour;
use crate::error::Result;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where the catalog database lives. None = platform data directory.
    pub database_path: Option<PathBuf>,

    /// Entries shown ahead of every stored tour. Selecting one opens
    /// its external link instead of the panorama viewer.
    pub virtual_tours: Vec<VirtualTour>,

    /// Quit after handing an external link to the browser
    pub exit_after_navigation: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            virtual_tours: vec![VirtualTour {
                id: "demo-external".into(),
                name: "IMKAN Dashboard".into(),
                preview_url: "https://placehold.co/400x400/222222/FFFFFF/png?text=IMKAN+Demo".into(),
                external_link: "http://dashboard.imkan.ae:8081/webroot/tours/sha/test2/".into(),
            }],
            exit_after_navigation: true,
        }
    }
}

impl AppConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("tour-viewer");
        path.push("config.json");
        Some(path)
    }

    /// Load the configuration, falling back to defaults.
    ///
    /// A missing file is normal. A file that can't be read or parsed is
    /// logged and ignored; the app still starts.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(Some(config)) => {
                tracing::info!("⚙️  Loaded configuration from {}", path.display());
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("⚠️  Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read a config file. Ok(None) if it does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(Self::from_json(&json)?))
    }

    /// Resolved catalog database location
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => super::library::Library::default_path(),
        }
    }

    #[cfg(test)]
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
