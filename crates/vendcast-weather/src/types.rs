use serde::{Deserialize, Serialize};
use vendcast_core::{AppError, ReqwestErrorExt, WeatherConfig};
use vendcast_forecast::DailyWeather;

/// Fixed forecast location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, timezone: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            timezone: timezone.into(),
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Self {
        Self::new(config.latitude, config.longitude, config.timezone.clone())
    }

    /// Same place to roughly 100 m, same timezone
    pub fn same_place(&self, other: &Location) -> bool {
        (self.latitude - other.latitude).abs() < 1e-3
            && (self.longitude - other.longitude).abs() < 1e-3
            && self.timezone == other.timezone
    }
}

/// Raw daily block from the Open-Meteo forecast endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
}

/// Raw API response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    pub daily: Option<DailyData>,
}

impl ApiResponse {
    /// Zip the daily arrays into one record per date, in response order.
    ///
    /// Days missing either temperature are skipped.
    pub fn into_daily_weather(self) -> Result<Vec<DailyWeather>, WeatherError> {
        let daily = self
            .daily
            .ok_or_else(|| WeatherError::Parse("response has no daily block".to_string()))?;

        let days = daily.time.len();
        if daily.temperature_2m_max.len() != days || daily.temperature_2m_min.len() != days {
            return Err(WeatherError::Parse(format!(
                "daily arrays differ in length: time={}, max={}, min={}",
                days,
                daily.temperature_2m_max.len(),
                daily.temperature_2m_min.len()
            )));
        }

        let series = daily
            .time
            .into_iter()
            .zip(daily.temperature_2m_max)
            .zip(daily.temperature_2m_min)
            .filter_map(|((date, max), min)| match (min, max) {
                (Some(min), Some(max)) => Some(DailyWeather::new(date, min, max)),
                _ => {
                    tracing::warn!("Skipping {} with missing temperature", date);
                    None
                }
            })
            .collect();

        Ok(series)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Failed to fetch weather data (status {status})")]
    Api { status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Api { status } if status >= 500 => {
                AppError::Weather(vendcast_core::WeatherError::Unavailable)
            }
            WeatherError::Api { status } => AppError::Weather(
                vendcast_core::WeatherError::Rejected(format!("status {}", status)),
            ),
            WeatherError::Parse(s) => {
                AppError::Weather(vendcast_core::WeatherError::Malformed(s))
            }
            WeatherError::Cache(s) => AppError::Weather(vendcast_core::WeatherError::Cache(s)),
        }
    }
}
