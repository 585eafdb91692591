//! Property tests for the forecast engine.
//!
//! Machines and weather series are generated within the ranges the machine
//! store and weather adapter accept.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use proptest::prelude::*;
use vendcast_forecast::{
    best_selling_summary, build_daily_forecast, calculate_weekly_summary, DailyWeather,
    LocationType, Machine, MachineInput,
};

fn location_strategy() -> impl Strategy<Value = LocationType> {
    prop_oneof![
        Just(LocationType::School),
        Just(LocationType::ShoppingMall),
        Just(LocationType::Hospital),
    ]
}

prop_compose! {
    fn machine_strategy()(
        n in 0u32..10_000,
        location_type in location_strategy(),
        sales in 0.0f64..5_000.0,
        margin in 0.0f64..=1.0,
        rent in 0.0f64..3_000.0,
        rate in 0.0f64..50.0,
    ) -> Machine {
        Machine::from_input(
            format!("machine-{n:08x}"),
            MachineInput {
                name: format!("Machine {n}"),
                location_type,
                expected_sales_per_day: sales,
                average_profit_margin_percentage: margin,
                rent_cost_per_day: rent,
                electric_cost_per_temp_per_day: rate,
            },
        )
    }
}

prop_compose! {
    fn weather_strategy()(
        days in prop::collection::vec((-10.0f64..40.0, 0.0f64..15.0), 0..14)
    ) -> Vec<DailyWeather> {
        days.into_iter()
            .enumerate()
            .map(|(i, (min, spread))| DailyWeather::new(format!("2024-06-{:02}", i + 1), min, min + spread))
            .collect()
    }
}

proptest! {
    #[test]
    fn no_machines_means_no_forecast(weather in weather_strategy()) {
        prop_assert!(build_daily_forecast(&[], &weather).is_empty());
    }

    #[test]
    fn no_weather_means_no_forecast(machines in prop::collection::vec(machine_strategy(), 0..8)) {
        prop_assert!(build_daily_forecast(&machines, &[]).is_empty());
    }

    #[test]
    fn forecast_preserves_length_and_dates(
        machines in prop::collection::vec(machine_strategy(), 1..8),
        weather in weather_strategy(),
    ) {
        let daily = build_daily_forecast(&machines, &weather);

        prop_assert_eq!(daily.len(), weather.len());
        for (row, day) in daily.iter().zip(&weather) {
            prop_assert_eq!(&row.date, &day.date);
            prop_assert_eq!(row.avg_temp, (day.min + day.max) / 2.0);
        }
    }

    #[test]
    fn weekly_electricity_matches_daily_sum(
        machines in prop::collection::vec(machine_strategy(), 1..8),
        weather in weather_strategy(),
    ) {
        let daily = build_daily_forecast(&machines, &weather);
        let summary = calculate_weekly_summary(&machines, &daily);
        let expected: f64 = daily.iter().map(|d| d.electricity_cost).sum();

        prop_assert_eq!(summary.total_electricity, expected);
        prop_assert!(summary.net_profit_or_loss.is_finite());
        if let Some(margin) = summary.profit_margin {
            prop_assert!(margin.is_finite());
        }
    }

    #[test]
    fn forecast_is_deterministic(
        machines in prop::collection::vec(machine_strategy(), 1..8),
        weather in weather_strategy(),
    ) {
        prop_assert_eq!(
            build_daily_forecast(&machines, &weather),
            build_daily_forecast(&machines, &weather)
        );
    }

    #[test]
    fn best_location_percent_is_bounded(machines in prop::collection::vec(machine_strategy(), 1..12)) {
        let summary = best_selling_summary(&machines).unwrap();
        prop_assert!(summary.percent <= 100);
        prop_assert!(summary.count >= 1);
        prop_assert!(machines.iter().any(|m| m.location_type == summary.location_type));
    }
}

#[test]
fn zero_sales_never_produces_margin() {
    let machines: Vec<Machine> = LocationType::all()
        .iter()
        .enumerate()
        .map(|(i, location_type)| {
            Machine::from_input(
                format!("machine-{i}"),
                MachineInput {
                    name: "Idle".to_string(),
                    location_type: *location_type,
                    expected_sales_per_day: 0.0,
                    average_profit_margin_percentage: 0.5,
                    rent_cost_per_day: 10.0,
                    electric_cost_per_temp_per_day: 1.0,
                },
            )
        })
        .collect();
    let weather = vec![DailyWeather::new("2024-01-01", 25.0, 33.0)];

    let daily = build_daily_forecast(&machines, &weather);
    let summary = calculate_weekly_summary(&machines, &daily);

    assert_eq!(summary.profit_margin, None);
    assert_eq!(calculate_weekly_summary(&[], &daily).profit_margin, None);
}

#[test]
fn seven_day_bangkok_week() {
    let machines = vec![
        Machine::from_input(
            "machine-001",
            MachineInput {
                name: "Siam Paragon Lobby".to_string(),
                location_type: LocationType::ShoppingMall,
                expected_sales_per_day: 180.0,
                average_profit_margin_percentage: 0.5,
                rent_cost_per_day: 50.0,
                electric_cost_per_temp_per_day: 1.0,
            },
        ),
        Machine::from_input(
            "machine-002",
            MachineInput {
                name: "Chulalongkorn University".to_string(),
                location_type: LocationType::School,
                expected_sales_per_day: 140.0,
                average_profit_margin_percentage: 0.5,
                rent_cost_per_day: 30.0,
                electric_cost_per_temp_per_day: 1.0,
            },
        ),
    ];
    let weather: Vec<_> = (1..=7)
        .map(|d| DailyWeather::new(format!("2024-04-{d:02}"), 28.0, 36.0))
        .collect();

    let daily = build_daily_forecast(&machines, &weather);
    let summary = calculate_weekly_summary(&machines, &daily);

    // revenue 160/day, rent 80/day, electricity 2 * 32 = 64/day
    assert!(daily.iter().all(|d| d.profit_or_loss == 16.0));
    assert_eq!(summary.total_revenue, 1120.0);
    assert_eq!(summary.total_rent, 560.0);
    assert_eq!(summary.total_electricity, 448.0);
    assert_eq!(summary.net_profit_or_loss, 112.0);
    assert_eq!(summary.avg_temp, Some(32.0));
    assert_eq!(summary.profit_margin, Some(10.0));
    assert!(summary.is_profit());
}
