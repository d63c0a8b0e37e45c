//! Bridge configuration loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable naming a file that receives every legacy log
/// message. Clearing it (or any write failure) turns the side channel off.
pub const LOG_FILE_PROPERTY: &str = "ij.log.file";

/// Application name used when no app-configuration plugin is installed.
pub const DEFAULT_APP_NAME: &str = "Lumen (legacy)";

/// Bundled icon used when no app-configuration plugin is installed.
pub const DEFAULT_ICON_PATH: &str = "icons/lumen-256.png";

/// Optional overrides for the bridge, loaded from TOML.
///
/// Everything defaults to "absent"; a missing config file is equivalent to
/// an empty one. Plugin-provided collaborators still take precedence over
/// these values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Application name override.
    #[serde(default)]
    pub app_name: Option<String>,

    /// Icon override.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Log-file default, used when the environment variable is unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl BridgeConfig {
    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
