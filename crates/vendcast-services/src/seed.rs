use vendcast_forecast::{LocationType, Machine, MachineInput};

/// Demo machines inserted into a new store
pub fn seed_machines() -> Vec<Machine> {
    vec![
        Machine::from_input(
            "machine-001",
            MachineInput {
                name: "Siam Paragon Lobby".to_string(),
                location_type: LocationType::ShoppingMall,
                expected_sales_per_day: 180.0,
                average_profit_margin_percentage: 0.42,
                rent_cost_per_day: 1500.0,
                electric_cost_per_temp_per_day: 12.0,
            },
        ),
        Machine::from_input(
            "machine-002",
            MachineInput {
                name: "Chulalongkorn University".to_string(),
                location_type: LocationType::School,
                expected_sales_per_day: 140.0,
                average_profit_margin_percentage: 0.38,
                rent_cost_per_day: 900.0,
                electric_cost_per_temp_per_day: 10.0,
            },
        ),
        Machine::from_input(
            "machine-003",
            MachineInput {
                name: "Bangkok Hospital Lobby".to_string(),
                location_type: LocationType::Hospital,
                expected_sales_per_day: 160.0,
                average_profit_margin_percentage: 0.4,
                rent_cost_per_day: 1100.0,
                electric_cost_per_temp_per_day: 11.0,
            },
        ),
    ]
}
