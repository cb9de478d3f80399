//! Configuration file handling
//!
//! Looked up at `--config <PATH>` or `~/.fx-gameplan/config.toml`. Every
//! field has a default, so a missing or partial file is fine.

use crate::data::sources::open_exchange_rates::OPEN_EXCHANGE_RATES_URL;
use crate::error::{GamePlanError, Result};
use crate::finance::constants::{
    DEFAULT_FIBONACCI_LENGTH, DEFAULT_PIP_INCREMENT, DEFAULT_UNIT_LOT_SIZE, MAX_CUSTOM_ENTRIES,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// openexchangerates.org `latest.json` endpoint
    pub rates_url: String,
    /// Environment variable holding the openexchangerates.org app id
    pub app_id_env: String,
    pub pip_increment: Decimal,
    pub fibonacci_length: usize,
    pub unit_lot_size: Decimal,
    pub max_custom_entries: usize,
    /// Where the plain report is written before mailing
    pub report_path: PathBuf,
    pub mail: MailConfig,
}

/// SMTP settings for mailing the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from: String,
    pub to: String,
    /// Login name, defaults to `from`
    pub username: Option<String>,
    /// Environment variable holding the SMTP password
    pub password_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rates_url: OPEN_EXCHANGE_RATES_URL.to_string(),
            app_id_env: "OXR_APP_ID".to_string(),
            pip_increment: DEFAULT_PIP_INCREMENT,
            fibonacci_length: DEFAULT_FIBONACCI_LENGTH,
            unit_lot_size: DEFAULT_UNIT_LOT_SIZE,
            max_custom_entries: MAX_CUSTOM_ENTRIES,
            report_path: PathBuf::from("output.txt"),
            mail: MailConfig::default(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.office365.com".to_string(),
            smtp_port: 587,
            from: String::new(),
            to: String::new(),
            username: None,
            password_env: "ZPASS".to_string(),
        }
    }
}

impl MailConfig {
    /// Sender and recipient are both set
    pub fn is_configured(&self) -> bool {
        !self.from.is_empty() && !self.to.is_empty()
    }
}

/// `~/.fx-gameplan/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fx-gameplan").join("config.toml"))
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| GamePlanError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the default location when `path` is `None`.
    ///
    /// Unreadable or invalid files are logged and replaced by defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return Config::default(),
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Config::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config {}: {}", path.display(), e);
                    Config::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pip_increment <= Decimal::ZERO {
            return Err(GamePlanError::ConfigError(
                "pip_increment must be positive".to_string(),
            ));
        }
        if self.unit_lot_size <= Decimal::ZERO {
            return Err(GamePlanError::ConfigError(
                "unit_lot_size must be positive".to_string(),
            ));
        }
        if self.max_custom_entries == 0 {
            return Err(GamePlanError::ConfigError(
                "max_custom_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The rates app id from the environment, if set
    pub fn app_id(&self) -> Option<String> {
        std::env::var(&self.app_id_env).ok().filter(|id| !id.is_empty())
    }
}
