use crate::cache::WeatherCache;
use crate::provider::WeatherProvider;
use crate::types::{Location, WeatherError};
use chrono::{DateTime, Utc};
use vendcast_core::Config;
use vendcast_forecast::DailyWeather;

/// Where a returned series came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    /// Fetched during this call
    Live,
    /// Cached and within the refresh interval
    Cache,
    /// Cached past the refresh interval; the refetch failed
    StaleCache,
}

/// Daily series plus its provenance
#[derive(Debug, Clone)]
pub struct WeatherSeries {
    pub days: Vec<DailyWeather>,
    pub source: SeriesSource,
    pub fetched_at: DateTime<Utc>,
}

/// Combines the provider and the file cache for one configured location
#[derive(Debug)]
pub struct WeatherService {
    provider: WeatherProvider,
    cache: WeatherCache,
    location: Location,
    forecast_days: u32,
    refresh_minutes: u32,
    max_age_hours: u32,
}

impl WeatherService {
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        let provider = WeatherProvider::new(&config.weather)?;
        let mut cache = WeatherCache::new(&config.config_dir);
        if let Err(e) = cache.load() {
            tracing::warn!("Failed to load weather cache: {}", e);
        }
        Ok(Self::with_parts(provider, cache, config))
    }

    pub fn with_parts(provider: WeatherProvider, cache: WeatherCache, config: &Config) -> Self {
        Self {
            provider,
            cache,
            location: Location::from_config(&config.weather),
            forecast_days: config.weather.forecast_days,
            refresh_minutes: config.weather.refresh_minutes,
            max_age_hours: config.weather.max_age_hours,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Daily series for the configured location.
    ///
    /// Fresh cache is returned as-is. Stale cache triggers a refetch and is
    /// returned if that fails. Expired or missing cache, or one written for another
    /// location or forecast length, requires a successful fetch.
    pub async fn daily_series(&mut self) -> Result<WeatherSeries, WeatherError> {
        self.daily_series_at(Utc::now()).await
    }

    pub async fn daily_series_at(&mut self, now: DateTime<Utc>) -> Result<WeatherSeries, WeatherError> {
        let usable = self.cache.matches(&self.location, self.forecast_days)
            && !self.cache.is_expired(self.max_age_hours, now);

        if usable && !self.cache.is_stale(self.refresh_minutes, now) {
            if let Some(cached) = self.cache.get() {
                tracing::debug!("Using cached weather from {}", cached.fetched_at);
                return Ok(WeatherSeries {
                    days: cached.series.clone(),
                    source: SeriesSource::Cache,
                    fetched_at: cached.fetched_at,
                });
            }
        }

        match self.provider.fetch_daily(&self.location).await {
            Ok(days) => {
                self.cache
                    .update_at(self.location.clone(), self.forecast_days, days.clone(), now);
                if let Err(e) = self.cache.save() {
                    tracing::warn!("Failed to save weather cache: {}", e);
                }
                Ok(WeatherSeries {
                    days,
                    source: SeriesSource::Live,
                    fetched_at: now,
                })
            }
            Err(e) => match self.cache.get() {
                Some(cached) if usable => {
                    tracing::warn!("Weather refresh failed, using data from {}: {}", cached.fetched_at, e);
                    Ok(WeatherSeries {
                        days: cached.series.clone(),
                        source: SeriesSource::StaleCache,
                        fetched_at: cached.fetched_at,
                    })
                }
                _ => {
                    tracing::error!("Failed to fetch weather data: {}", e);
                    Err(e)
                }
            },
        }
    }
}
