use crate::core::analysis::AnalysisOptions;
use crate::core::currency::RateTable;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_canonical_currency() -> String {
    "TWD".to_string()
}

fn default_skip_zero_amounts() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Label of the unit every rate converts into.
    #[serde(default = "default_canonical_currency")]
    pub canonical_currency: String,
    /// Marker to rate overrides, layered over the built-in table.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
    pub data_path: Option<String>,
    #[serde(default = "default_skip_zero_amounts")]
    pub skip_zero_amounts: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            canonical_currency: default_canonical_currency(),
            rates: BTreeMap::new(),
            data_path: None,
            skip_zero_amounts: default_skip_zero_amounts(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("tw", "superthanks", "superthanks")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .rate_table()
            .with_context(|| format!("Invalid rates in {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Built-in rates overlaid with the configured ones.
    pub fn rate_table(&self) -> Result<RateTable> {
        let mut table = RateTable::with_defaults();
        table.merge(&self.rates)?;
        Ok(table)
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            skip_zero_amounts: self.skip_zero_amounts,
        }
    }
}
