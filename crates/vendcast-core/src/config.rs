//! `config.toml` for Vendcast: weather location, storage and display settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// One problem found in a loaded config
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    /// Dotted key, e.g. `weather.latitude`
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Issues found by [`Config::validate`]. Errors stop startup, warnings are logged.
#[derive(Debug, Clone, Default)]
pub struct ConfigReport {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<ConfigIssue>,
}

impl ConfigReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(ConfigIssue {
            field,
            message: message.into(),
        });
    }

    fn warn(&mut self, field: &'static str, message: impl Into<String>) {
        self.warnings.push(ConfigIssue {
            field,
            message: message.into(),
        });
    }

    /// All errors on one line, `; `-separated
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        parts.join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (database, weather cache)
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather source settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Machine storage settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Machine input conventions
    #[serde(default)]
    pub machines: MachinesConfig,

    /// Output formatting
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Latitude of the forecast location
    pub latitude: f64,

    /// Longitude of the forecast location
    pub longitude: f64,

    /// IANA timezone used to bucket daily values
    pub timezone: String,

    /// Number of days requested from the API
    pub forecast_days: u32,

    /// Open-Meteo forecast endpoint
    pub api_url: String,

    /// Cached data older than this is refreshed (minutes)
    pub refresh_minutes: u32,

    /// Cached data older than this is discarded (hours)
    pub max_age_hours: u32,

    /// HTTP request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        // Bangkok
        Self {
            latitude: 13.754,
            longitude: 100.5014,
            timezone: "Asia/Bangkok".to_string(),
            forecast_days: 7,
            api_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            refresh_minutes: 10,
            max_age_hours: 24,
            request_timeout_secs: 10,
        }
    }
}

/// Where machines are kept between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    /// A JSON array of machines, rewritten after every change
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite file name, relative to `config_dir`
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// JSON file name for the `json` backend, relative to `config_dir`
    #[serde(default = "default_json_file")]
    pub json_file: String,

    /// Insert the demo machines when the database is created
    #[serde(default = "default_seed_on_first_run")]
    pub seed_on_first_run: bool,
}

fn default_database_file() -> String {
    "machines.db".to_string()
}

fn default_json_file() -> String {
    "machines.json".to_string()
}

fn default_seed_on_first_run() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_file: default_database_file(),
            json_file: default_json_file(),
            seed_on_first_run: default_seed_on_first_run(),
        }
    }
}

/// Unit used when entering a machine's profit margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarginUnit {
    /// 0.0 – 1.0
    #[default]
    Fraction,
    /// 0 – 100
    Percent,
}

impl MarginUnit {
    /// Upper bound of a valid margin in this unit
    pub fn max_value(&self) -> f64 {
        match self {
            MarginUnit::Fraction => 1.0,
            MarginUnit::Percent => 100.0,
        }
    }

    /// Convert a margin expressed in this unit to a fraction
    pub fn to_fraction(&self, value: f64) -> f64 {
        match self {
            MarginUnit::Fraction => value,
            MarginUnit::Percent => value / 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachinesConfig {
    #[serde(default)]
    pub margin_unit: MarginUnit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum fraction digits for currency amounts
    #[serde(default)]
    pub fraction_digits: usize,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vendcast")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            store: StoreConfig::default(),
            machines: MachinesConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Read `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let fresh = Self::default();
            fresh.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(fresh);
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` (or the per-user `config.toml`) and reject it if validation finds errors.
    /// Warnings are logged and returned with the config.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ConfigReport), ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path().map_err(|e| ConfigError::Unreadable(format!("{:#}", e)))?,
        };

        let config = Self::load_from(&path).map_err(|e| {
            if e.downcast_ref::<toml::de::Error>().is_some() {
                ConfigError::ParseError(format!("{:#}", e))
            } else {
                ConfigError::Unreadable(format!("{:#}", e))
            }
        })?;

        let report = config.validate();
        if !report.is_ok() {
            return Err(ConfigError::Invalid(report.summary()));
        }
        for issue in &report.warnings {
            tracing::warn!("Config: {}", issue);
        }

        Ok((config, report))
    }

    /// Check ranges and URLs without touching the filesystem
    pub fn validate(&self) -> ConfigReport {
        let mut report = ConfigReport::default();
        let weather = &self.weather;

        if !(-90.0..=90.0).contains(&weather.latitude) {
            report.error("weather.latitude", "Latitude must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&weather.longitude) {
            report.error("weather.longitude", "Longitude must be between -180 and 180");
        }
        if weather.timezone.trim().is_empty() {
            report.error("weather.timezone", "Timezone must not be empty");
        }

        // Open-Meteo serves at most 16 days
        match weather.forecast_days {
            0 | 17.. => report.error("weather.forecast_days", "Forecast days must be between 1 and 16"),
            7 => {}
            _ => report.warn(
                "weather.forecast_days",
                "Weekly summary covers more or less than 7 days",
            ),
        }

        check_api_url(&weather.api_url, &mut report);

        if weather.refresh_minutes == 0 {
            report.warn("weather.refresh_minutes", "Weather cache disabled (0 minutes)");
        }
        if u64::from(weather.max_age_hours) * 60 < u64::from(weather.refresh_minutes) {
            report.warn("weather.max_age_hours", "Cache expires before it becomes stale");
        }
        if weather.request_timeout_secs == 0 {
            report.error("weather.request_timeout_secs", "Request timeout must be greater than 0");
        }

        let store_file = match self.store.backend {
            StoreBackend::Sqlite => ("store.database_file", &self.store.database_file),
            StoreBackend::Json => ("store.json_file", &self.store.json_file),
        };
        if store_file.1.trim().is_empty() {
            report.error(store_file.0, "Store file name must not be empty");
        }
        if self.display.fraction_digits > 4 {
            report.warn(
                "display.fraction_digits",
                "More than 4 fraction digits for currency amounts",
            );
        }

        report
    }

    /// Write as TOML, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Path of the machine database
    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join(&self.store.database_file)
    }

    /// Path of the machines file for the `json` backend
    pub fn machines_json_path(&self) -> PathBuf {
        self.config_dir.join(&self.store.json_file)
    }

    /// `<user config dir>/vendcast/config.toml`
    fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("No user config directory on this system")?;
        Ok(base.join("vendcast").join("config.toml"))
    }
}

fn check_api_url(raw: &str, report: &mut ConfigReport) {
    const FIELD: &str = "weather.api_url";

    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            report.error(FIELD, format!("Invalid URL: {}", e));
            return;
        }
    };
    if !matches!(url.scheme(), "http" | "https") {
        report.error(FIELD, format!("URL must use http or https scheme, got: {}", url.scheme()));
    }
    if url.host().is_none() {
        report.error(FIELD, "URL must have a host");
    }
    if url.port() == Some(0) {
        report.error(FIELD, "Port cannot be 0");
    }
}
