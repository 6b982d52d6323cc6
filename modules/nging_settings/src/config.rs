//! Configuration for the settings module

use crate::domain::service::DEFAULT_MAX_VALUE_SIZE;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings module configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database holding the config table; without it only defaults are used
    #[serde(default)]
    pub database_url: Option<String>,

    /// Run the config table migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Lock file written by the installer; database settings are read only once it exists
    #[serde(default = "default_install_lock")]
    pub install_lock: PathBuf,

    /// Extra defaults (YAML) merged over the built-in ones
    #[serde(default)]
    pub defaults_file: Option<PathBuf>,

    /// Log filter used outside debug mode
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// ANSI colors on the console target
    #[serde(default)]
    pub log_colorable: bool,

    /// Maximum size of a single setting value in bytes
    #[serde(default = "default_max_value_size")]
    pub max_value_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            run_migrations: true,
            install_lock: default_install_lock(),
            defaults_file: None,
            log_level: default_log_level(),
            log_colorable: false,
            max_value_size: default_max_value_size(),
        }
    }
}

impl Config {
    /// Built-in defaults, then the YAML file (if any), then `NGING_SETTINGS_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("NGING_SETTINGS_"))
            .extract()
            .context("invalid settings module configuration")
    }
}

fn default_true() -> bool {
    true
}

fn default_install_lock() -> PathBuf {
    PathBuf::from("config/installed.lock")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_value_size() -> usize {
    DEFAULT_MAX_VALUE_SIZE
}
