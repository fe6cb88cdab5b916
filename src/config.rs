//! Client settings: defaults, then an optional TOML file, then `PET_MALL_*`
//! environment variables.

use crate::{cart::DEFAULT_MAX_LINE_QUANTITY, catalog::DEFAULT_PAGE_SIZE};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const DEFAULT_CONFIG_FILE: &str = "pet_mall.toml";
const ENV_PREFIX: &str = "PET_MALL";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the REST API, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub max_line_quantity: u32,
    /// Session token; normally written by the host's session store.
    pub token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 500,
            request_timeout_secs: 15,
            max_line_quantity: DEFAULT_MAX_LINE_QUANTITY,
            token: None,
        }
    }
}

impl Settings {
    /// Loads settings from `config_path`, or from `pet_mall.toml` when no path
    /// is given. An explicit path must exist; problems with the default file
    /// fall back to defaults with a warning.
    pub fn load(config_path: Option<&str>) -> Result<Self, SettingsError> {
        match Self::load_from_file(config_path) {
            Ok(settings) => Ok(settings),
            Err(err) if config_path.is_none() => {
                warn!("Could not read config file: {err}. Using default configuration.");
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    fn load_from_file(config_path: Option<&str>) -> Result<Self, SettingsError> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        let settings = Config::builder()
            .add_source(File::with_name(path).required(config_path.is_some()))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
