//! Lenient row normalization: raw CSV strings → typed records with derived
//! metrics.
//!
//! Numeric coercion is deliberately forgiving: a malformed amount becomes 0
//! rather than rejecting the row, so a half-edited table still loads. Month
//! tokens are the exception — a row whose month cannot be parsed is kept and
//! flagged (`month: None`) rather than silently dropped, so history is never
//! undercounted without the caller knowing.

use crate::models::{MonthlyRecord, PurchaseEntry, RawHistoryRow, RawPurchaseRow};
use chrono::{Datelike, NaiveDate};
use tracing::warn;

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Parse a calendar date: ISO first, then the common export formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%b %d, %Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d %b %Y") {
        return Some(d);
    }

    None
}

/// Parse a month token to the first day of that month.
/// Accepts compact "YYYY-MM" or any date-like value ("2024-03-15" → 2024-03-01).
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if s.len() == 7 && s.as_bytes()[4] == b'-' {
        let year: i32 = s[..4].parse().ok()?;
        let month: u32 = s[5..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    let d = parse_date(s)?;
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1)
}

/// Lenient monetary coercion: strip currency symbols and separators, default
/// to 0.0 on failure, clamp negatives to 0.0. Availability over strictness —
/// a garbled cell must not take the whole table down.
pub fn parse_money_lenient(s: Option<&str>) -> f64 {
    let Some(s) = s else { return 0.0 };
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v < 0.0 => {
            warn!("Negative amount {:?} clamped to 0", s);
            0.0
        }
        Ok(v) => v,
        Err(_) => 0.0,
    }
}

/// Lenient count coercion: digits only, 0 on failure.
pub fn parse_count_lenient(s: Option<&str>) -> u32 {
    let Some(s) = s else { return 0 };
    let cleaned: String = s.trim().chars().filter(|c| c.is_ascii_digit()).collect();
    cleaned.parse().unwrap_or(0)
}

/// Zero-guarded division: `None` when the denominator is not positive,
/// never 0 and never a NaN sentinel.
fn ratio(numer: f64, denom: f64) -> Option<f64> {
    if denom > 0.0 { Some(numer / denom) } else { None }
}

// ── History row → MonthlyRecord ───────────────────────────────────────────────

pub fn history_row_to_record(row: &RawHistoryRow) -> MonthlyRecord {
    let month = row.month.as_deref().and_then(parse_month);
    if month.is_none() {
        warn!("Unparseable month {:?} — row kept but flagged", row.month);
    }

    let revenue = parse_money_lenient(row.revenue.as_deref());
    let cogs_sold = parse_money_lenient(row.cogs_sold.as_deref());
    let ppc = parse_money_lenient(row.ppc.as_deref());
    let amazon_fees = parse_money_lenient(row.amazon_fees.as_deref());
    let other_variable = parse_money_lenient(row.other_variable.as_deref());
    let fixed_costs = parse_money_lenient(row.fixed_costs.as_deref());

    let core_profit = revenue - cogs_sold - ppc - amazon_fees - other_variable;

    MonthlyRecord {
        month,
        revenue,
        cogs_sold,
        ppc,
        amazon_fees,
        other_variable,
        fixed_costs,
        orders: parse_count_lenient(row.orders.as_deref()),
        core_profit,
        net_profit: core_profit - fixed_costs,
        roi_on_spend: ratio(core_profit, cogs_sold),
        margin_on_revenue: ratio(core_profit, revenue),
        rev_to_spend: ratio(revenue, cogs_sold),
    }
}

/// Normalize a whole history table: every row converted (flagged rows
/// included), sorted ascending by month with flagged rows last. Duplicate
/// months are preserved as separate rows.
pub fn normalize_history(rows: &[RawHistoryRow]) -> Vec<MonthlyRecord> {
    let mut records: Vec<MonthlyRecord> = rows.iter().map(history_row_to_record).collect();
    records.sort_by_key(|r| (r.month.is_none(), r.month));

    let flagged = records.iter().filter(|r| r.month.is_none()).count();
    if flagged > 0 {
        warn!("{} history row(s) have an unparseable month", flagged);
    }
    records
}

// ── Purchase row → PurchaseEntry ──────────────────────────────────────────────

/// Convert a raw purchase row. Amounts coerce leniently; the category string
/// passes through verbatim (validation belongs to the editing surface). A row
/// without a parseable date carries no usable information and is skipped.
pub fn purchase_row_to_entry(row: &RawPurchaseRow) -> Option<PurchaseEntry> {
    let date_str = row.date.as_deref()?.trim();
    let date = match parse_date(date_str) {
        Some(d) => d,
        None => {
            warn!("Skipping purchase with unparseable date {:?}", date_str);
            return None;
        }
    };

    Some(PurchaseEntry {
        date,
        supplier: row.supplier.clone().unwrap_or_default().trim().to_string(),
        category: row.category.clone().unwrap_or_default().trim().to_string(),
        amount_gbp: parse_money_lenient(row.amount_gbp.as_deref()),
        notes: row.notes.clone().unwrap_or_default().trim().to_string(),
    })
}

/// Normalize the purchase log, ordered by date for display.
pub fn normalize_purchases(rows: &[RawPurchaseRow]) -> Vec<PurchaseEntry> {
    let mut entries: Vec<PurchaseEntry> = rows.iter().filter_map(purchase_row_to_entry).collect();
    entries.sort_by_key(|e| e.date);
    entries
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month_compact_and_datelike() {
        assert_eq!(parse_month("2024-03"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_month("2024-03-15"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_month("Mar 15, 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("garbage"), None);
    }

    #[test]
    fn test_parse_money_lenient() {
        assert_eq!(parse_money_lenient(Some("£1,234.56")), 1234.56);
        assert_eq!(parse_money_lenient(Some("610.00")), 610.0);
        assert_eq!(parse_money_lenient(Some("not a number")), 0.0);
        assert_eq!(parse_money_lenient(Some("")), 0.0);
        assert_eq!(parse_money_lenient(None), 0.0);
        // negatives clamp, never flow into the ratio math
        assert_eq!(parse_money_lenient(Some("-50")), 0.0);
    }

    #[test]
    fn test_parse_count_lenient() {
        assert_eq!(parse_count_lenient(Some("1,234")), 1234);
        assert_eq!(parse_count_lenient(Some("oops")), 0);
        assert_eq!(parse_count_lenient(None), 0);
    }

    fn row(month: &str, rev: &str, cogs: &str, ppc: &str, fees: &str, other: &str, fixed: &str) -> RawHistoryRow {
        RawHistoryRow {
            month: Some(month.into()),
            revenue: Some(rev.into()),
            cogs_sold: Some(cogs.into()),
            ppc: Some(ppc.into()),
            amazon_fees: Some(fees.into()),
            other_variable: Some(other.into()),
            fixed_costs: Some(fixed.into()),
            orders: Some("100".into()),
        }
    }

    #[test]
    fn test_derived_metrics() {
        let r = history_row_to_record(&row(
            "2024-05", "12000", "8000", "900", "2700", "200", "600",
        ));
        assert_eq!(r.core_profit, 300.0);
        assert_eq!(r.net_profit, -300.0);
        assert_eq!(r.roi_on_spend, Some(300.0 / 8000.0));
        assert_eq!(r.margin_on_revenue, Some(300.0 / 12000.0));
        assert_eq!(r.rev_to_spend, Some(1.5));
    }

    #[test]
    fn test_net_profit_identity() {
        let r = history_row_to_record(&row(
            "2024-01", "9500", "6100", "740", "2210", "150", "580",
        ));
        let expected = r.revenue - r.cogs_sold - r.ppc - r.amazon_fees - r.other_variable - r.fixed_costs;
        assert_eq!(r.net_profit, expected);
    }

    #[test]
    fn test_zero_cogs_ratios_undefined_not_zero() {
        let r = history_row_to_record(&row("2024-02", "5000", "0", "0", "0", "0", "0"));
        assert_eq!(r.roi_on_spend, None);
        assert_eq!(r.rev_to_spend, None);
        assert_eq!(r.margin_on_revenue, Some(1.0));
    }

    #[test]
    fn test_normalize_history_sorts_and_flags() {
        let rows = vec![
            row("2024-06", "1", "1", "0", "0", "0", "0"),
            row("not-a-month", "2", "1", "0", "0", "0", "0"),
            row("2024-04", "3", "1", "0", "0", "0", "0"),
            row("2024-04", "4", "1", "0", "0", "0", "0"), // duplicate month kept
        ];
        let recs = normalize_history(&rows);
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].month, Some(ymd(2024, 4, 1)));
        assert_eq!(recs[1].month, Some(ymd(2024, 4, 1)));
        assert_eq!(recs[2].month, Some(ymd(2024, 6, 1)));
        assert_eq!(recs[3].month, None); // flagged, not dropped
        assert_eq!(recs[3].revenue, 2.0);
    }

    #[test]
    fn test_purchase_amount_coerces_category_passes_through() {
        let raw = RawPurchaseRow {
            date: Some("2024-06-03".into()),
            supplier: Some("Acme Ltd".into()),
            category: Some("Freight".into()), // not in the known set
            amount_gbp: Some("n/a".into()),
            notes: None,
        };
        let e = purchase_row_to_entry(&raw).unwrap();
        assert_eq!(e.amount_gbp, 0.0);
        assert_eq!(e.category, "Freight");
    }

    #[test]
    fn test_purchase_without_date_skipped() {
        let raw = RawPurchaseRow {
            date: Some("???".into()),
            ..Default::default()
        };
        assert!(purchase_row_to_entry(&raw).is_none());
    }
}
