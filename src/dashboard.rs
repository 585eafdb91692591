//! Terminal rendering of machines, forecasts and summaries.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};
use vendcast_forecast::{BestSellingSummary, DailyForecast, Machine, WeeklySummary};

/// Format an amount in Thai baht, e.g. `฿1,234` or `-฿20`.
///
/// Rounds to at most `fraction_digits` decimals; at least two decimals are kept
/// when more than two are allowed.
pub fn format_thb(value: f64, fraction_digits: usize) -> String {
    if !value.is_finite() {
        return "฿--".to_string();
    }

    let formatted = format!("{:.*}", fraction_digits, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, f),
        None => (formatted.as_str(), ""),
    };

    let min_digits = fraction_digits.min(2);
    let mut frac = frac_part.to_string();
    while frac.len() > min_digits && frac.ends_with('0') {
        frac.pop();
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{}฿{}", sign, group_thousands(int_part))
    } else {
        format!("{}฿{}.{}", sign, group_thousands(int_part), frac)
    }
}

/// `value` is already a percentage: `format_percent(40.0, 0)` is `40%`
pub fn format_percent(value: f64, fraction_digits: usize) -> String {
    format!("{:.*}%", fraction_digits, value)
}

/// One decimal, e.g. `32.0`
pub fn format_temp(value: f64) -> String {
    format!("{:.1}", value)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Table layout shared by the machine and forecast listings; columns from
/// `numeric_from` onwards are right-aligned.
fn render_rows<R: Tabled>(rows: Vec<R>, numeric_from: usize) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(numeric_from..)).with(Alignment::right()));
    format!("{}\n", table)
}

#[derive(Tabled)]
struct MachineRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location Type")]
    location_type: String,
    #[tabled(rename = "Expected Sales")]
    expected_sales: String,
    #[tabled(rename = "Avg Profit Margin")]
    margin: String,
    #[tabled(rename = "Rent / Day")]
    rent: String,
    #[tabled(rename = "Electric / °C")]
    electric: String,
}

impl MachineRow {
    fn new(m: &Machine, fraction_digits: usize) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            location_type: m.location_type.to_string(),
            expected_sales: format_thb(m.expected_sales_per_day, fraction_digits),
            margin: format_percent(m.average_profit_margin_percentage * 100.0, 0),
            rent: format_thb(m.rent_cost_per_day, fraction_digits),
            electric: m.electric_cost_per_temp_per_day.to_string(),
        }
    }
}

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Min Temp (°C)")]
    min_temp: String,
    #[tabled(rename = "Max Temp (°C)")]
    max_temp: String,
    #[tabled(rename = "Avg Temp (°C)")]
    avg_temp: String,
    #[tabled(rename = "Electricity Cost")]
    electricity: String,
    #[tabled(rename = "Profit / Loss")]
    profit_or_loss: String,
}

impl ForecastRow {
    fn new(day: &DailyForecast, fraction_digits: usize) -> Self {
        Self {
            date: day.date.clone(),
            min_temp: format_temp(day.min_temp),
            max_temp: format_temp(day.max_temp),
            avg_temp: format_temp(day.avg_temp),
            electricity: format_thb(day.electricity_cost, fraction_digits),
            profit_or_loss: format_thb(day.profit_or_loss, fraction_digits),
        }
    }
}

pub fn render_machines(machines: &[Machine], fraction_digits: usize) -> String {
    let mut out = String::from("MACHINES\n");
    if machines.is_empty() {
        out.push_str("No machines yet.\n");
        return out;
    }

    let rows = machines.iter().map(|m| MachineRow::new(m, fraction_digits)).collect();
    out.push_str(&render_rows::<MachineRow>(rows, 3));
    out
}

/// `days` is the configured forecast length, used in the heading
pub fn render_forecast(daily: &[DailyForecast], days: u32, fraction_digits: usize) -> String {
    let mut out = format!("{}-DAY FORECAST\n", days);
    if daily.is_empty() {
        out.push_str("No forecast data available.\n");
        return out;
    }

    let rows = daily.iter().map(|d| ForecastRow::new(d, fraction_digits)).collect();
    out.push_str(&render_rows::<ForecastRow>(rows, 1));
    out
}

pub fn render_weekly_summary(summary: &WeeklySummary, days: usize, fraction_digits: usize) -> String {
    let avg_temp = summary
        .avg_temp
        .map(|t| format!("{}°C", format_temp(t)))
        .unwrap_or_else(|| "--°C".to_string());
    let margin = summary
        .profit_margin
        .map(|m| format_percent(m, 1))
        .unwrap_or_else(|| "--".to_string());
    let outcome = if summary.is_profit() {
        "↑ Profitable"
    } else {
        "↓ Loss recorded"
    };

    let mut out = String::from("WEEKLY FORECAST SUMMARY\n");
    out.push_str(&format!(
        "  Revenue          {}  (total {} days)\n",
        format_thb(summary.total_revenue, fraction_digits),
        days
    ));
    out.push_str(&format!(
        "  Rent             {}\n",
        format_thb(summary.total_rent, fraction_digits)
    ));
    out.push_str(&format!(
        "  Electric         {}  (avg temp {})\n",
        format_thb(summary.total_electricity, fraction_digits),
        avg_temp
    ));
    out.push_str(&format!(
        "  Net profit/loss  {}  {}\n",
        format_thb(summary.net_profit_or_loss, fraction_digits),
        outcome
    ));
    out.push_str(&format!("  Profit margin    {}\n", margin));
    out
}

/// Empty when there is no best location
pub fn render_best_location(best: Option<&BestSellingSummary>, fraction_digits: usize) -> String {
    let Some(best) = best else {
        return String::new();
    };

    format!(
        "BEST SELLING LOCATION\n  {}  Total Sales: {}/day\n  {} machines • {}% of total\n",
        best.location_type,
        format_thb(best.total_sales, fraction_digits),
        best.count,
        best.percent
    )
}
