use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a machine is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    #[serde(rename = "SCHOOL")]
    School,
    #[serde(rename = "SHOPPING MALL", alias = "SHOPPING_MALL")]
    ShoppingMall,
    #[serde(rename = "HOSPITAL")]
    Hospital,
}

impl LocationType {
    /// Stored/display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::School => "SCHOOL",
            Self::ShoppingMall => "SHOPPING MALL",
            Self::Hospital => "HOSPITAL",
        }
    }

    /// Get all location variants
    pub fn all() -> &'static [LocationType] {
        &[Self::School, Self::ShoppingMall, Self::Hospital]
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown location type: {0}")]
pub struct ParseLocationTypeError(pub String);

impl FromStr for LocationType {
    type Err = ParseLocationTypeError;

    /// Accepts the stored labels case-insensitively, with `_` or `-` for the space
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "SCHOOL" => Ok(Self::School),
            "SHOPPING MALL" => Ok(Self::ShoppingMall),
            "HOSPITAL" => Ok(Self::Hospital),
            _ => Err(ParseLocationTypeError(s.to_string())),
        }
    }
}

/// A deployed vending machine and its daily economics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub location_type: LocationType,
    /// Gross sales per day, before margin
    pub expected_sales_per_day: f64,
    /// Share of sales kept as profit, as a fraction in [0, 1]
    pub average_profit_margin_percentage: f64,
    pub rent_cost_per_day: f64,
    /// Electricity cost per degree of average daily temperature
    pub electric_cost_per_temp_per_day: f64,
}

impl Machine {
    /// Build a machine from validated input and an assigned id
    pub fn from_input(id: impl Into<String>, input: MachineInput) -> Self {
        Self {
            id: id.into(),
            name: input.name,
            location_type: input.location_type,
            expected_sales_per_day: input.expected_sales_per_day,
            average_profit_margin_percentage: input.average_profit_margin_percentage,
            rent_cost_per_day: input.rent_cost_per_day,
            electric_cost_per_temp_per_day: input.electric_cost_per_temp_per_day,
        }
    }

    /// Replace every field except the id
    pub fn apply(&mut self, input: MachineInput) {
        let id = std::mem::take(&mut self.id);
        *self = Self::from_input(id, input);
    }

    /// Profit contributed per day before rent and electricity
    pub fn revenue_per_day(&self) -> f64 {
        self.expected_sales_per_day * self.average_profit_margin_percentage
    }

    /// Electricity cost for a day with the given average temperature
    pub fn electricity_cost(&self, avg_temp: f64) -> f64 {
        self.electric_cost_per_temp_per_day * avg_temp
    }
}

/// Machine fields supplied by a form or the CLI (everything but the id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineInput {
    pub name: String,
    pub location_type: LocationType,
    pub expected_sales_per_day: f64,
    pub average_profit_margin_percentage: f64,
    pub rent_cost_per_day: f64,
    pub electric_cost_per_temp_per_day: f64,
}

impl From<&Machine> for MachineInput {
    fn from(machine: &Machine) -> Self {
        Self {
            name: machine.name.clone(),
            location_type: machine.location_type,
            expected_sales_per_day: machine.expected_sales_per_day,
            average_profit_margin_percentage: machine.average_profit_margin_percentage,
            rent_cost_per_day: machine.rent_cost_per_day,
            electric_cost_per_temp_per_day: machine.electric_cost_per_temp_per_day,
        }
    }
}
