use crate::retry::{with_retry, RetryConfig};
use crate::types::{ApiResponse, Location, WeatherError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use vendcast_core::WeatherConfig;
use vendcast_forecast::DailyWeather;

const USER_AGENT: &str = concat!("Vendcast/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo daily temperature client
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    forecast_days: u32,
    retry: RetryConfig,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.api_url.clone(),
            forecast_days: config.forecast_days,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch one daily min/max series for `location`, ordered by date
    pub async fn fetch_daily(&self, location: &Location) -> Result<Vec<DailyWeather>, WeatherError> {
        let url = self.base_url.as_str();
        let query = self.query(location);

        tracing::debug!(
            "Fetching {} days of weather for {:.4},{:.4}",
            self.forecast_days,
            location.latitude,
            location.longitude
        );

        let response = with_retry(&self.retry, || self.client.get(url).query(&query).send()).await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Weather API returned status {}", status);
            return Err(WeatherError::Api {
                status: status.as_u16(),
            });
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let series = body.into_daily_weather()?;
        tracing::info!("Fetched {} days of weather", series.len());
        Ok(series)
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("daily", "temperature_2m_max,temperature_2m_min".to_string()),
            ("timezone", location.timezone.clone()),
            ("forecast_days", self.forecast_days.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_query_parameters() {
        let provider = WeatherProvider::new(&WeatherConfig::default()).unwrap();
        let query = provider.query(&Location::new(13.754, 100.5014, "Asia/Bangkok"));

        assert!(query.contains(&("latitude", "13.754".to_string())));
        assert!(query.contains(&("longitude", "100.5014".to_string())));
        assert!(query.contains(&("daily", "temperature_2m_max,temperature_2m_min".to_string())));
        assert!(query.contains(&("timezone", "Asia/Bangkok".to_string())));
        assert!(query.contains(&("forecast_days", "7".to_string())));
    }
}
