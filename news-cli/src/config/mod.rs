//! Run configuration
//!
//! Settings are layered: CLI flags win over the process environment (which
//! includes anything loaded from `.env`), which wins over an optional TOML
//! file, which wins over the built-in defaults.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::news::QuoteMode;

/// Environment variable names
pub mod vars {
    pub const SHEET_ID: &str = "SHEET_ID";
    pub const TAB_NAME: &str = "TAB_NAME";
    pub const DATA_RANGE: &str = "FULL_DATA_RANGE";
    pub const KEY_FILE: &str = "SERVICE_ACCOUNT_KEY_FILE";
    pub const OUTPUT_DIR: &str = "OUTPUT_DIR";
    pub const QUOTE_MODE: &str = "QUOTE_MODE";
}

pub const DEFAULT_KEY_FILE: &str = "key/service-account.json";
pub const DEFAULT_OUTPUT_DIR: &str = "script";

/// Settings as they may appear in a TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub sheet_id: Option<String>,
    pub tab_name: Option<String>,
    pub data_range: Option<String>,
    pub key_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub quote_mode: Option<QuoteMode>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub key_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub quote_mode: Option<QuoteMode>,
}

/// Configuration problem detected before any work starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing { var: &'static str },
    Invalid { var: &'static str, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing { var } => {
                write!(f, "{} is not set (environment, .env or config file)", var)
            }
            ConfigError::Invalid { var, message } => write!(f, "{}: {}", var, message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sheet_id: String,
    pub tab_name: String,
    pub data_range: String,
    pub key_file: PathBuf,
    pub output_dir: PathBuf,
    pub quote_mode: QuoteMode,
}

impl Config {
    /// Load from the process environment, an optional TOML file and overrides
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                FileConfig::from_path(path)?
            }
            None => FileConfig::default(),
        };

        let config = Self::resolve(file, |var| std::env::var(var).ok(), overrides)?;
        Ok(config)
    }

    /// Merge the layers; `env` looks up an environment variable
    pub fn resolve<F>(file: FileConfig, env: F, overrides: &Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |var: &str| env(var).filter(|v| !v.trim().is_empty());

        let required = |var: &'static str, fallback: Option<String>| {
            lookup(var)
                .or(fallback)
                .ok_or(ConfigError::Missing { var })
        };

        let quote_mode = match overrides.quote_mode {
            Some(mode) => mode,
            None => match lookup(vars::QUOTE_MODE) {
                Some(raw) => raw.parse::<QuoteMode>().map_err(|message| ConfigError::Invalid {
                    var: vars::QUOTE_MODE,
                    message,
                })?,
                None => file.quote_mode.unwrap_or_default(),
            },
        };

        Ok(Self {
            sheet_id: required(vars::SHEET_ID, file.sheet_id)?,
            tab_name: required(vars::TAB_NAME, file.tab_name)?,
            data_range: required(vars::DATA_RANGE, file.data_range)?,
            key_file: overrides
                .key_file
                .clone()
                .or_else(|| lookup(vars::KEY_FILE).map(PathBuf::from))
                .or(file.key_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_FILE)),
            output_dir: overrides
                .output_dir
                .clone()
                .or_else(|| lookup(vars::OUTPUT_DIR).map(PathBuf::from))
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            quote_mode,
        })
    }
}
