//! Field validation for machine input.

use std::fmt;

use vendcast_core::MarginUnit;
use vendcast_forecast::MachineInput;

/// One rejected field and the message shown next to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors for one input, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// First message for `field`, if any
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Check `input` and return it with the name trimmed and the margin converted
/// from `unit` to a fraction.
///
/// # Errors
/// Returns every failing field, not just the first.
pub fn validate_input(input: MachineInput, unit: MarginUnit) -> Result<MachineInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = input.name.trim().to_string();
    if name.is_empty() {
        errors.add("name", "Name is required.");
    }

    if !non_negative(input.expected_sales_per_day) {
        errors.add("expected_sales_per_day", "Expected Sales must be ≥ 0");
    }

    let margin = input.average_profit_margin_percentage;
    if !margin.is_finite() || margin < 0.0 {
        errors.add("average_profit_margin_percentage", "Minimum is 0%");
    } else if margin > unit.max_value() {
        errors.add("average_profit_margin_percentage", "Maximum is 100%");
    }

    if !non_negative(input.rent_cost_per_day) {
        errors.add("rent_cost_per_day", "Rent cost must be ≥ 0");
    }

    if !non_negative(input.electric_cost_per_temp_per_day) {
        errors.add("electric_cost_per_temp_per_day", "Electric cost must be ≥ 0");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(MachineInput {
        name,
        average_profit_margin_percentage: unit.to_fraction(margin),
        ..input
    })
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
