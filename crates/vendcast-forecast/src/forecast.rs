//! Daily and weekly profit/loss forecasts.
//!
//! Revenue and rent do not depend on the weather, so they are summed once per
//! call. Electricity scales with each day's average temperature and is the only
//! per-day term. The weekly electricity total is always the sum of the daily
//! values already produced, never a fresh computation from machines and weather.

use crate::machine::Machine;
use crate::types::{DailyForecast, DailyWeather, WeeklySummary};

/// Σ sales × margin across machines
fn revenue_per_day(machines: &[Machine]) -> f64 {
    machines.iter().map(Machine::revenue_per_day).sum()
}

/// Σ rent across machines
fn rent_per_day(machines: &[Machine]) -> f64 {
    machines.iter().map(|m| m.rent_cost_per_day).sum()
}

/// Forecast one row per weather day, in the weather series' order.
///
/// Returns an empty vec when either input is empty.
pub fn build_daily_forecast(machines: &[Machine], weather: &[DailyWeather]) -> Vec<DailyForecast> {
    if machines.is_empty() || weather.is_empty() {
        return Vec::new();
    }

    let revenue = revenue_per_day(machines);
    let rent = rent_per_day(machines);

    tracing::debug!(
        machines = machines.len(),
        days = weather.len(),
        revenue,
        rent,
        "Building daily forecast"
    );

    weather
        .iter()
        .map(|day| {
            let avg_temp = day.avg_temp();
            let electricity_cost: f64 = machines.iter().map(|m| m.electricity_cost(avg_temp)).sum();

            DailyForecast {
                date: day.date.clone(),
                min_temp: day.min,
                max_temp: day.max,
                avg_temp,
                electricity_cost,
                profit_or_loss: revenue - rent - electricity_cost,
            }
        })
        .collect()
}

/// Aggregate a daily forecast over its whole window.
///
/// Returns a zeroed summary with no average temperature or margin when either
/// input is empty. `profit_margin` is only present when revenue is positive.
pub fn calculate_weekly_summary(machines: &[Machine], daily: &[DailyForecast]) -> WeeklySummary {
    if machines.is_empty() || daily.is_empty() {
        return WeeklySummary::default();
    }

    let days = daily.len() as f64;
    let total_revenue = revenue_per_day(machines) * days;
    let total_rent = rent_per_day(machines) * days;
    let total_electricity: f64 = daily.iter().map(|d| d.electricity_cost).sum();
    let net_profit_or_loss = total_revenue - total_rent - total_electricity;

    let avg_temp = daily.iter().map(|d| d.avg_temp).sum::<f64>() / days;

    let profit_margin = if total_revenue > 0.0 {
        Some(net_profit_or_loss / total_revenue * 100.0)
    } else {
        None
    };

    WeeklySummary {
        total_revenue,
        total_rent,
        total_electricity,
        net_profit_or_loss,
        avg_temp: Some(avg_temp),
        profit_margin,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::machine::{LocationType, MachineInput};

    fn machine(id: &str, sales: f64, margin: f64, rent: f64, rate: f64) -> Machine {
        Machine::from_input(
            id,
            MachineInput {
                name: format!("Machine {id}"),
                location_type: LocationType::School,
                expected_sales_per_day: sales,
                average_profit_margin_percentage: margin,
                rent_cost_per_day: rent,
                electric_cost_per_temp_per_day: rate,
            },
        )
    }

    #[test]
    fn test_single_machine_single_day() {
        let machines = vec![machine("a", 100.0, 0.5, 20.0, 2.0)];
        let weather = vec![DailyWeather::new("2024-01-01", 20.0, 30.0)];

        let daily = build_daily_forecast(&machines, &weather);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, "2024-01-01");
        assert_eq!(daily[0].avg_temp, 25.0);
        assert_eq!(daily[0].min_temp, 20.0);
        assert_eq!(daily[0].max_temp, 30.0);
        assert_eq!(daily[0].electricity_cost, 50.0);
        assert_eq!(daily[0].profit_or_loss, -20.0);
    }

    #[test]
    fn test_empty_inputs_yield_empty_forecast() {
        let machines = vec![machine("a", 100.0, 0.5, 20.0, 2.0)];
        let weather = vec![DailyWeather::new("2024-01-01", 20.0, 30.0)];

        assert!(build_daily_forecast(&[], &weather).is_empty());
        assert!(build_daily_forecast(&machines, &[]).is_empty());
    }

    #[test]
    fn test_electricity_varies_by_day() {
        let machines = vec![machine("a", 180.0, 0.42, 1500.0, 12.0), machine("b", 140.0, 0.38, 900.0, 10.0)];
        let weather = vec![
            DailyWeather::new("2024-04-01", 28.0, 36.0),
            DailyWeather::new("2024-04-02", 24.0, 30.0),
        ];

        let daily = build_daily_forecast(&machines, &weather);

        // 12*32 + 10*32, then 12*27 + 10*27
        assert_eq!(daily[0].electricity_cost, 704.0);
        assert_eq!(daily[1].electricity_cost, 594.0);
        assert!(daily[1].profit_or_loss > daily[0].profit_or_loss);
    }

    #[test]
    fn test_weekly_summary_two_days() {
        let machines = vec![machine("a", 100.0, 0.5, 20.0, 2.0)];
        let weather = vec![
            DailyWeather::new("2024-01-01", 20.0, 30.0),
            DailyWeather::new("2024-01-02", 20.0, 30.0),
        ];
        let daily = build_daily_forecast(&machines, &weather);

        let summary = calculate_weekly_summary(&machines, &daily);

        assert_eq!(summary.total_revenue, 100.0);
        assert_eq!(summary.total_rent, 40.0);
        assert_eq!(summary.total_electricity, 100.0);
        assert_eq!(summary.net_profit_or_loss, -40.0);
        assert_eq!(summary.avg_temp, Some(25.0));
        assert_eq!(summary.profit_margin, Some(-40.0));
        assert!(!summary.is_profit());
    }

    #[test]
    fn test_weekly_summary_empty_is_zeroed() {
        let machines = vec![machine("a", 100.0, 0.5, 20.0, 2.0)];

        let summary = calculate_weekly_summary(&machines, &[]);
        assert_eq!(summary, WeeklySummary::default());
        assert_eq!(summary.avg_temp, None);
        assert_eq!(summary.profit_margin, None);

        let daily = build_daily_forecast(&machines, &[DailyWeather::new("2024-01-01", 20.0, 30.0)]);
        assert_eq!(calculate_weekly_summary(&[], &daily), WeeklySummary::default());
    }

    #[test]
    fn test_zero_revenue_has_no_margin() {
        let machines = vec![machine("a", 0.0, 0.5, 20.0, 2.0)];
        let weather = vec![DailyWeather::new("2024-01-01", 20.0, 30.0)];
        let daily = build_daily_forecast(&machines, &weather);

        let summary = calculate_weekly_summary(&machines, &daily);

        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.profit_margin, None);
        assert!(summary.net_profit_or_loss.is_finite());
    }

    #[test]
    fn test_weekly_electricity_is_sum_of_daily() {
        let machines = vec![machine("a", 180.0, 0.42, 1500.0, 12.1), machine("b", 160.0, 0.4, 1100.0, 11.3)];
        let weather: Vec<_> = (1..=7)
            .map(|d| DailyWeather::new(format!("2024-05-0{d}"), 25.1 + d as f64 * 0.3, 33.7 + d as f64 * 0.1))
            .collect();
        let daily = build_daily_forecast(&machines, &weather);

        let summary = calculate_weekly_summary(&machines, &daily);
        let expected: f64 = daily.iter().map(|d| d.electricity_cost).sum();

        assert_eq!(summary.total_electricity, expected);
    }
}
