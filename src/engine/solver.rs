//! Required-spend solver: inverts the profit equation under two independent
//! methods and blends them.

use crate::models::{EfficiencyProfile, SpendTargets};

/// Floor on the effective efficiency denominator. An undefined or ~0 ratio
/// becomes a very large finite spend figure instead of dividing by zero —
/// degenerate inputs get a degenerate-but-defined answer, never a panic.
pub const EPSILON: f64 = 1e-9;

/// Solve for the spend that should generate `target_profit` net this month.
///
/// Funding requirement is `target_profit + fixed_costs`: fixed costs drag on
/// the result regardless of spend, so the core profit generated has to cover
/// both. `realization` scales each efficiency ratio down for the share of
/// this month's spend that only sells next month; `buffer` pads every
/// estimate multiplicatively.
///
/// Method 1 divides by ROI-on-spend. Method 2 divides by margin × turnover,
/// which reaches the same quantity through the revenue side. The blend is
/// their geometric mean: less dominated by one wild estimate than an
/// arithmetic mean would be. The blend is `None` when either method comes
/// out negative, which only happens when the caller feeds a negative
/// funding requirement.
pub fn compute_required_spend(
    target_profit: f64,
    fixed_costs: f64,
    profile: &EfficiencyProfile,
    realization: f64,
    buffer: f64,
) -> SpendTargets {
    let funding = target_profit + fixed_costs;
    let padding = 1.0 + buffer;

    let roi_eff = profile.avg_roi.unwrap_or(0.0) * realization;
    let spend_roi = funding / roi_eff.max(EPSILON) * padding;

    let margin_eff = profile.avg_margin.unwrap_or(0.0)
        * profile.avg_rev_to_spend.unwrap_or(0.0)
        * realization;
    let spend_margin = funding / margin_eff.max(EPSILON) * padding;

    let spend_blended = if spend_roi >= 0.0 && spend_margin >= 0.0 {
        Some((spend_roi * spend_margin).sqrt())
    } else {
        None
    };

    SpendTargets {
        spend_roi,
        spend_margin,
        spend_blended,
    }
}
