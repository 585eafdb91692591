//! Weather source for Vendcast
//!
//! Fetches daily min/max temperatures from the Open-Meteo API for a fixed
//! location, with retry on transient failures and a persistent JSON cache.

pub mod cache;
pub mod provider;
pub mod retry;
pub mod service;
pub mod types;

pub use cache::{CachedSeries, WeatherCache};
pub use provider::WeatherProvider;
pub use retry::RetryConfig;
pub use service::{SeriesSource, WeatherSeries, WeatherService};
pub use types::*;
pub use vendcast_forecast::DailyWeather;
