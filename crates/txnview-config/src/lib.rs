//! YAML configuration for txnview
//!
//! Sections: `fixtures` (data file and paging), `reconciler` (fetch
//! sequencing), `display` (list formatting) and `logging`.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, ConfigErrorDetails, ConfigResult};

/// Fixture data settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// Path to the JSON fixture file
    #[serde(default = "default_fixtures_path")]
    pub path: PathBuf,
    /// Transactions per page for the paginated feed
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Simulated latency added to every request, in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            path: default_fixtures_path(),
            page_size: default_page_size(),
            latency_ms: 0,
        }
    }
}

impl FixturesConfig {
    /// Latency as a `Duration`
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

fn default_fixtures_path() -> PathBuf {
    PathBuf::from("./fixtures/data.json")
}

fn default_page_size() -> usize {
    5
}

/// What to do with a fetch result whose orchestration call was superseded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResultPolicy {
    /// Apply a result only if no newer orchestration call started meanwhile
    Discard,
    /// Apply every result as it arrives; the last one to land wins
    LastWriteWins,
}

impl Default for StaleResultPolicy {
    fn default() -> Self {
        StaleResultPolicy::Discard
    }
}

impl std::str::FromStr for StaleResultPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "discard" => Ok(StaleResultPolicy::Discard),
            "last_write_wins" => Ok(StaleResultPolicy::LastWriteWins),
            _ => Err(format!("Invalid stale result policy: {}", s)),
        }
    }
}

impl std::fmt::Display for StaleResultPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleResultPolicy::Discard => write!(f, "discard"),
            StaleResultPolicy::LastWriteWins => write!(f, "last_write_wins"),
        }
    }
}

/// View reconciler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Handling of results from superseded fetches
    #[serde(default)]
    pub stale_results: StaleResultPolicy,
    /// Re-enable the employee selector as soon as the directory has loaded,
    /// before the transaction page arrives
    #[serde(default = "default_true")]
    pub release_selector_early: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            stale_results: StaleResultPolicy::default(),
            release_selector_early: true,
        }
    }
}

/// Transaction list formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Symbol printed in front of amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// chrono format string for transaction dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Print the approval status column
    #[serde(default = "default_true")]
    pub show_approval: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            date_format: default_date_format(),
            show_approval: true,
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const MAX_DECIMAL_PLACES: u32 = 10;

/// Top-level configuration; every section may be omitted
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse YAML text and validate the result
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.fixtures.page_size == 0 {
            return Err(ConfigError::invalid("fixtures.page_size", "must be greater than 0"));
        }
        if self.display.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::invalid(
                "display.decimal_places",
                format!("must be at most {}", MAX_DECIMAL_PLACES),
            ));
        }
        if self.display.date_format.trim().is_empty() {
            return Err(ConfigError::invalid("display.date_format", "must not be empty"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("must be one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        Ok(())
    }

    /// The commented template written by `--print-config`
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
