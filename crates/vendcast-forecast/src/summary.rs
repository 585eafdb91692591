use crate::machine::{LocationType, Machine};
use crate::types::BestSellingSummary;

/// Running totals for one location category
struct LocationTotals {
    location_type: LocationType,
    total: f64,
    count: usize,
}

/// Find the location category with the highest total expected sales.
///
/// Returns `None` when there are no machines. Categories are compared in the
/// order they first appear in `machines`; on a tie the earlier one wins.
pub fn best_selling_summary(machines: &[Machine]) -> Option<BestSellingSummary> {
    if machines.is_empty() {
        return None;
    }

    // First-seen order, one entry per location type
    let mut groups: Vec<LocationTotals> = Vec::with_capacity(LocationType::all().len());
    for machine in machines {
        match groups.iter_mut().find(|g| g.location_type == machine.location_type) {
            Some(group) => {
                group.total += machine.expected_sales_per_day;
                group.count += 1;
            }
            None => groups.push(LocationTotals {
                location_type: machine.location_type,
                total: machine.expected_sales_per_day,
                count: 1,
            }),
        }
    }

    let mut grand_total = 0.0;
    let mut best: Option<&LocationTotals> = None;
    for group in &groups {
        grand_total += group.total;
        if best.map_or(true, |b| group.total > b.total) {
            best = Some(group);
        }
    }

    let best = best?;
    let percent = if grand_total > 0.0 {
        (best.total / grand_total * 100.0).round() as u32
    } else {
        0
    };

    Some(BestSellingSummary {
        location_type: best.location_type,
        total_sales: best.total,
        count: best.count,
        percent,
    })
}
