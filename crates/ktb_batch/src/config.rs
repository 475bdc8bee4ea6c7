//! Batch configuration management.
//!
//! Handles loading of `ktb.toml` with environment variable override support.
//! Every section is optional; missing values fall back to the defaults below.
//!
//! ```toml
//! log_level = "info"
//!
//! [filter]
//! exclude_accounts = ["Account1", "Account2"]
//! include_traders = ["bob", "tom", "terry"]
//! exclude_trade_name_suffix = "Dup"
//!
//! [fx]
//! base_currency = "USD"
//! currencies = ["USD", "KRW", "JPY"]
//!
//! [market_data]
//! fixture = "data/input/market_data/bloomberg_fixture.csv"
//! timeout_ms = 2000
//!
//! [paths]
//! blotter_dir = "data/input/blotter"
//! output_dir = "data/output/charts"
//! ```

use ktb_risk::FilterRules;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "ktb.toml";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// FX settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FxConfig {
    /// Currency every DV01 is expressed in
    pub base_currency: String,
    /// Currencies the desk reports; also the currency include-list when
    /// `[filter] include_currencies` is empty
    pub currencies: Vec<String>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            currencies: Vec::new(),
        }
    }
}

/// Market data settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Fixture CSV served by the Bloomberg-style provider
    pub fixture: Option<PathBuf>,
    /// Per-lookup timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            timeout_ms: 2_000,
        }
    }
}

/// File locations
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding blotter snapshots; the newest is used
    pub blotter_dir: PathBuf,
    /// Explicit blotter file, taking precedence over `blotter_dir`
    pub blotter: Option<PathBuf>,
    /// Directory receiving `KTB_<date>.html` and the CSV export
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            blotter_dir: PathBuf::from("data/input/blotter"),
            blotter: None,
            output_dir: PathBuf::from("data/output/charts"),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Also write `KTB_<date>_exposures.csv`
    pub csv_export: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { csv_export: true }
    }
}

/// Batch configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct KtbConfig {
    /// Log level
    pub log_level: String,
    /// Trade filter rules
    pub filter: FilterRules,
    /// FX settings
    pub fx: FxConfig,
    /// Market data settings
    pub market_data: MarketDataConfig,
    /// File locations
    pub paths: PathsConfig,
    /// Output settings
    pub output: OutputConfig,
}

impl Default for KtbConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            filter: FilterRules::default(),
            fx: FxConfig::default(),
            market_data: MarketDataConfig::default(),
            paths: PathsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

impl KtbConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Load configuration from `path` if it exists, otherwise defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `KTB_*` environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(log_level) = var("KTB_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(base) = var("KTB_BASE_CURRENCY") {
            self.fx.base_currency = base;
        }

        if let Some(fixture) = var("KTB_MARKET_DATA") {
            self.market_data.fixture = Some(PathBuf::from(fixture));
        }

        if let Some(timeout) = var("KTB_TIMEOUT_MS") {
            // Unparseable values are left for validate() to report.
            self.market_data.timeout_ms = timeout.parse().unwrap_or(0);
        }

        if let Some(dir) = var("KTB_BLOTTER_DIR") {
            self.paths.blotter_dir = PathBuf::from(dir);
        }

        if let Some(blotter) = var("KTB_BLOTTER") {
            self.paths.blotter = Some(PathBuf::from(blotter));
        }

        if let Some(dir) = var("KTB_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(dir);
        }

        self
    }

    /// Filter rules with the FX currency list standing in for an empty
    /// currency include-list
    pub fn filter_rules(&self) -> FilterRules {
        let mut rules = self.filter.clone();
        if rules.include_currencies.is_empty() {
            rules.include_currencies = self.fx.currencies.clone();
        }
        rules
    }

    /// Desk include-lists that are empty and therefore admit any value
    pub fn warnings(&self) -> Vec<String> {
        let rules = self.filter_rules();
        [
            ("include_traders", &rules.include_traders),
            ("include_asset_types", &rules.include_asset_types),
            ("include_asset_classes", &rules.include_asset_classes),
            ("include_currencies", &rules.include_currencies),
            ("include_auto_open_close", &rules.include_auto_open_close),
        ]
        .into_iter()
        .filter(|(_, list)| list.is_empty())
        .map(|(name, _)| format!("filter.{} is empty; no trade is rejected on this field", name))
        .collect()
    }

    /// Validate the configuration, collecting every problem.
    ///
    /// Empty include-lists are not errors; each one is logged as a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for warning in self.warnings() {
            tracing::warn!("{}", warning);
        }

        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if !is_currency_code(&self.fx.base_currency) {
            errors.push(format!(
                "Invalid fx.base_currency '{}'. Expected a 3-letter ISO code",
                self.fx.base_currency
            ));
        }

        for code in &self.fx.currencies {
            if !is_currency_code(code) {
                errors.push(format!("Invalid currency '{}' in fx.currencies", code));
            }
        }

        if self.market_data.timeout_ms == 0 {
            errors.push("market_data.timeout_ms must be a positive integer".to_string());
        }

        if self.paths.blotter.is_none() && self.paths.blotter_dir.as_os_str().is_empty() {
            errors.push("paths.blotter_dir cannot be empty when paths.blotter is unset".to_string());
        }

        if self.paths.output_dir.as_os_str().is_empty() {
            errors.push("paths.output_dir cannot be empty".to_string());
        }

        if self.filter.exclude_trade_name_suffix.as_deref() == Some("") {
            errors.push("filter.exclude_trade_name_suffix cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error reading {path}: {message}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying message
        message: String,
    },
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
