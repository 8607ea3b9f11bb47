//! Trailing-window efficiency averages.

use crate::models::{EfficiencyProfile, MonthlyRecord};

/// Mean of the defined values only. `None` when nothing in the window had a
/// value — an empty-month window must not masquerade as 0% efficiency.
fn mean_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values.flatten() {
        sum += v;
        n += 1;
    }
    if n > 0 { Some(sum / n as f64) } else { None }
}

/// Average the three efficiency ratios over the last `window_n` rows.
///
/// The window is strictly the last N rows present, not a calendar range —
/// gaps in the history do not shrink it. A window larger than the table is
/// just the whole table. Each ratio is averaged independently: a month with
/// zero COGS drops out of the ROI mean but still contributes to the margin
/// mean.
pub fn rolling_avgs(records: &[MonthlyRecord], window_n: usize) -> EfficiencyProfile {
    if records.is_empty() {
        return EfficiencyProfile::UNDEFINED;
    }

    let start = records.len().saturating_sub(window_n);
    let tail = &records[start..];

    EfficiencyProfile {
        avg_roi: mean_defined(tail.iter().map(|r| r.roi_on_spend)),
        avg_margin: mean_defined(tail.iter().map(|r| r.margin_on_revenue)),
        avg_rev_to_spend: mean_defined(tail.iter().map(|r| r.rev_to_spend)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawHistoryRow;
    use crate::normalize::normalize_history;

    fn history(rows: &[(&str, f64, f64)]) -> Vec<MonthlyRecord> {
        let raws: Vec<RawHistoryRow> = rows
            .iter()
            .map(|(month, rev, cogs)| RawHistoryRow {
                month: Some((*month).into()),
                revenue: Some(rev.to_string()),
                cogs_sold: Some(cogs.to_string()),
                ..Default::default()
            })
            .collect();
        normalize_history(&raws)
    }

    #[test]
    fn test_empty_table_all_undefined() {
        assert_eq!(rolling_avgs(&[], 3), EfficiencyProfile::UNDEFINED);
    }

    #[test]
    fn test_window_larger_than_table_equals_full_table() {
        let recs = history(&[
            ("2024-01", 10000.0, 5000.0),
            ("2024-02", 12000.0, 6000.0),
        ]);
        assert_eq!(rolling_avgs(&recs, 12), rolling_avgs(&recs, recs.len()));
    }

    #[test]
    fn test_takes_last_n_rows() {
        let recs = history(&[
            ("2024-01", 1000.0, 1000.0), // rev_to_spend = 1.0, outside window
            ("2024-02", 4000.0, 2000.0), // 2.0
            ("2024-03", 12000.0, 3000.0), // 4.0
        ]);
        let p = rolling_avgs(&recs, 2);
        assert_eq!(p.avg_rev_to_spend, Some(3.0));
    }

    #[test]
    fn test_undefined_excluded_per_field() {
        // Second month has zero COGS: its ROI and rev/spend are undefined and
        // must be skipped, while its margin still counts.
        let recs = history(&[
            ("2024-01", 10000.0, 5000.0), // roi 1.0, margin 0.5, turn 2.0
            ("2024-02", 8000.0, 0.0),     // roi None, margin 1.0, turn None
        ]);
        let p = rolling_avgs(&recs, 2);
        assert_eq!(p.avg_roi, Some(1.0));
        assert_eq!(p.avg_rev_to_spend, Some(2.0));
        assert_eq!(p.avg_margin, Some(0.75));
    }

    #[test]
    fn test_all_undefined_field_stays_undefined() {
        let recs = history(&[("2024-01", 5000.0, 0.0)]);
        let p = rolling_avgs(&recs, 3);
        assert_eq!(p.avg_roi, None);
        assert_eq!(p.avg_rev_to_spend, None);
    }
}
