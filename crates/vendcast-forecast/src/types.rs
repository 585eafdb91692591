use serde::{Deserialize, Serialize};

use crate::machine::LocationType;

/// Temperature bounds for one calendar date, as supplied by the weather source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    /// `YYYY-MM-DD`
    pub date: String,
    pub min: f64,
    pub max: f64,
}

impl DailyWeather {
    pub fn new(date: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            date: date.into(),
            min,
            max,
        }
    }

    /// Midpoint of the day's min and max
    pub fn avg_temp(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Forecast for one day, aggregated over all machines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub electricity_cost: f64,
    pub profit_or_loss: f64,
}

/// Aggregate over the whole forecast window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub total_revenue: f64,
    pub total_rent: f64,
    pub total_electricity: f64,
    pub net_profit_or_loss: f64,
    /// Mean of the daily average temperatures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_temp: Option<f64>,
    /// Net result as a percentage of revenue; absent when revenue is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,
}

impl WeeklySummary {
    pub fn is_profit(&self) -> bool {
        self.net_profit_or_loss >= 0.0
    }
}

/// The location category with the highest expected sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSellingSummary {
    pub location_type: LocationType,
    pub total_sales: f64,
    pub count: usize,
    /// Share of all expected sales, rounded to a whole percent
    pub percent: u32,
}
