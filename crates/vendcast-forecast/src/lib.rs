//! Profit/loss forecast engine for Vendcast
//!
//! Pure functions over machine snapshots and a daily weather series:
//! per-day forecasts, a weekly aggregate and the best-selling location.
//! Nothing in this crate performs I/O or mutates its inputs.

pub mod forecast;
pub mod machine;
pub mod summary;
pub mod types;

pub use forecast::{build_daily_forecast, calculate_weekly_summary};
pub use machine::{LocationType, Machine, MachineInput, ParseLocationTypeError};
pub use summary::best_selling_summary;
pub use types::{BestSellingSummary, DailyForecast, DailyWeather, WeeklySummary};
