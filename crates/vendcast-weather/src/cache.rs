use crate::types::{Location, WeatherError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vendcast_forecast::DailyWeather;

const CACHE_FILE: &str = "weather_cache.json";

/// One fetched series, as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSeries {
    pub location: Location,
    /// Days requested; files written before this was recorded read as 0
    #[serde(default)]
    pub forecast_days: u32,
    pub series: Vec<DailyWeather>,
    pub fetched_at: DateTime<Utc>,
}

/// Last fetched daily series, persisted as JSON in the config directory
#[derive(Debug)]
pub struct WeatherCache {
    cache_path: PathBuf,
    data: Option<CachedSeries>,
}

impl WeatherCache {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            cache_path: config_dir.join(CACHE_FILE),
            data: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    /// Load the cache file if present.
    ///
    /// A missing file is not an error. An unreadable file is logged and the
    /// cache starts empty.
    pub fn load(&mut self) -> Result<(), WeatherError> {
        if !self.cache_path.exists() {
            tracing::debug!("No weather cache at {:?}", self.cache_path);
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.cache_path)
            .map_err(|e| WeatherError::Cache(format!("read {:?}: {}", self.cache_path, e)))?;

        match serde_json::from_str::<CachedSeries>(&content) {
            Ok(data) => {
                tracing::debug!(
                    "Loaded {} cached days fetched at {}",
                    data.series.len(),
                    data.fetched_at
                );
                self.data = Some(data);
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable weather cache: {}", e);
                self.data = None;
            }
        }
        Ok(())
    }

    pub fn get(&self) -> Option<&CachedSeries> {
        self.data.as_ref()
    }

    /// Replace the cached series, stamped with the current time
    pub fn update(&mut self, location: Location, forecast_days: u32, series: Vec<DailyWeather>) {
        self.update_at(location, forecast_days, series, Utc::now());
    }

    pub fn update_at(
        &mut self,
        location: Location,
        forecast_days: u32,
        series: Vec<DailyWeather>,
        fetched_at: DateTime<Utc>,
    ) {
        self.data = Some(CachedSeries {
            location,
            forecast_days,
            series,
            fetched_at,
        });
    }

    pub fn save(&self) -> Result<(), WeatherError> {
        let Some(data) = &self.data else {
            return Ok(());
        };

        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| WeatherError::Cache(format!("create {:?}: {}", parent, e)))?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| WeatherError::Cache(format!("serialize: {}", e)))?;
        std::fs::write(&self.cache_path, content)
            .map_err(|e| WeatherError::Cache(format!("write {:?}: {}", self.cache_path, e)))?;

        tracing::debug!("Saved weather cache to {:?}", self.cache_path);
        Ok(())
    }

    /// Older than `refresh_minutes`; empty counts as stale
    pub fn is_stale(&self, refresh_minutes: u32, now: DateTime<Utc>) -> bool {
        self.older_than(Duration::minutes(i64::from(refresh_minutes)), now)
    }

    /// Older than `max_age_hours`; empty counts as expired
    pub fn is_expired(&self, max_age_hours: u32, now: DateTime<Utc>) -> bool {
        self.older_than(Duration::hours(i64::from(max_age_hours)), now)
    }

    /// Cached data was fetched for `location` with the same number of days
    pub fn matches(&self, location: &Location, forecast_days: u32) -> bool {
        self.data
            .as_ref()
            .is_some_and(|d| d.forecast_days == forecast_days && d.location.same_place(location))
    }

    fn older_than(&self, age: Duration, now: DateTime<Utc>) -> bool {
        match &self.data {
            Some(data) => now - data.fetched_at > age,
            None => true,
        }
    }
}
