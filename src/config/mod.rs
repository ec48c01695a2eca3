use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    core::{
        seed,
        utils::{ensure_dir, write_atomic, PathResolver},
    },
    domain::{is_valid_amount, MAX_AMOUNT},
    errors::BudgetError,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Install the sample expenses on first run.
    pub seed_defaults: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_initial_balance: Decimal,
    /// Overrides the data directory (defaults to `<app dir>/data`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            seed_defaults: true,
            default_initial_balance: seed::default_initial_balance(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), BudgetError> {
        let code = self.currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(BudgetError::ConfigError(format!(
                "`{}` is not an ISO 4217 currency code",
                self.currency
            )));
        }
        if self.locale.trim().is_empty() {
            return Err(BudgetError::ConfigError("locale must not be empty".into()));
        }
        if !is_valid_amount(self.default_initial_balance) {
            return Err(BudgetError::ConfigError(format!(
                "default initial balance must be between 0 and {MAX_AMOUNT}"
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, BudgetError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Reads the configuration, falling back to defaults when the file is
    /// absent. Present but invalid files are an error.
    pub fn load(&self) -> Result<Config, BudgetError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| BudgetError::ConfigError(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    /// Directory that holds the expense and simulation documents.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (ConfigManager, TempDir) {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        (manager, temp)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (manager, _guard) = manager();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency, "BRL");
    }

    #[test]
    fn save_then_load() {
        let (manager, _guard) = manager();
        let config = Config {
            locale: "en-US".into(),
            currency: "USD".into(),
            seed_defaults: false,
            default_initial_balance: Decimal::new(250050, 2),
            data_dir: None,
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let (manager, _guard) = manager();
        fs::write(manager.path(), r#"{"currency":"USD"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency, "USD");
        assert!(config.seed_defaults);
        assert_eq!(config.default_initial_balance, Decimal::from(5000));
    }

    #[test]
    fn invalid_currency_is_rejected() {
        let (manager, _guard) = manager();
        fs::write(manager.path(), r#"{"currency":"reais"}"#).unwrap();
        assert!(matches!(manager.load(), Err(BudgetError::ConfigError(_))));
    }

    #[test]
    fn out_of_range_default_balance_is_rejected() {
        let config = Config {
            default_initial_balance: MAX_AMOUNT + Decimal::ONE,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(BudgetError::ConfigError(_))));
    }

    #[test]
    fn data_dir_defaults_under_base() {
        let (manager, guard) = manager();
        let config = Config::default();
        assert_eq!(manager.data_dir(&config), guard.path().join("data"));
    }
}
