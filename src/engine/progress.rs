//! Current-month spend progress against the blended target.

use crate::models::{PurchaseEntry, SpendTargets};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Half-open bounds of the calendar month containing `now`:
/// `[first day, first day of next month)`.
pub fn month_bounds(now: NaiveDate) -> (NaiveDate, NaiveDate) {
    // from_ymd_opt(_, _, 1) cannot fail for a month taken from a valid date
    let start = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or(now);
    let end = start + Months::new(1);
    (start, end)
}

/// Sum of purchases in the active month whose category matches `category`
/// exactly (case-sensitive — "cogs" is not "COGS"). 0.0 when nothing matches.
pub fn current_month_spend(purchases: &[PurchaseEntry], now: NaiveDate, category: &str) -> f64 {
    let (start, end) = month_bounds(now);
    purchases
        .iter()
        .filter(|p| p.date >= start && p.date < end && p.category == category)
        .map(|p| p.amount_gbp)
        .sum()
}

/// Raw numbers for the gauge: what was spent this month and what the solver
/// says should be spent. No pre-formatted delta — sign conventions belong to
/// the presentation layer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressReport {
    pub month_start: NaiveDate,
    pub month_spend: f64,
    pub target_blended: Option<f64>,
}

impl ProgressReport {
    pub fn build(purchases: &[PurchaseEntry], now: NaiveDate, category: &str, targets: &SpendTargets) -> Self {
        Self {
            month_start: month_bounds(now).0,
            month_spend: current_month_spend(purchases, now, category),
            target_blended: targets.spend_blended,
        }
    }
}
