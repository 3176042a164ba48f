use formgrid_import::{ColumnMapping, DEFAULT_FORM_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "formgrid.config.json";

/// Formgrid configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Form name used when an import does not supply one
    #[serde(default = "default_form_name")]
    pub default_form_name: String,

    /// Spreadsheet headers for each field attribute
    #[serde(default)]
    pub columns: ColumnMapping,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_form_name() -> String {
    DEFAULT_FORM_NAME.to_string()
}

fn default_pretty() -> bool {
    true
}

impl Config {
    pub fn path(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }

    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn to_json(&self, value: &impl Serialize) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_form_name: default_form_name(),
            columns: ColumnMapping::default(),
            pretty: default_pretty(),
        }
    }
}
