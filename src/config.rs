//! Persistence configuration
//!
//! Where the app state lives. Every field has a default, so an empty JSON
//! object is a valid config.

use std::path::PathBuf;

use serde::Deserialize;

use crate::persistence::STORAGE_KEY;

/// Directory name under the OS local data dir (native only)
pub const APP_DIR_NAME: &str = "staff-roster";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Key the app state is stored under
    pub storage_key: String,
    /// Directory for the native file store; `None` = OS local data dir
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Parse a JSON config, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Use a fixed data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Data directory for the native store, if one can be determined
    #[cfg(not(target_arch = "wasm32"))]
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) => Some(dir.clone()),
            None => dirs::data_local_dir().map(|p| p.join(APP_DIR_NAME)),
        }
    }
}
