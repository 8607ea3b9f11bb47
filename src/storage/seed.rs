//! Deterministic sample tables used when no data has been persisted yet.
//!
//! Six months of history (Jan–Jun 2025, a gently growing FBA account with
//! £600/month fixed costs) and two purchases in June 2025. Values are fixed
//! constants so every fresh install computes the same numbers.

use crate::models::{RawHistoryRow, RawPurchaseRow};

const SAMPLE_HISTORY: [(&str, &str, &str, &str, &str, &str, &str, &str); 6] = [
    ("2025-01", "9800", "6200", "750", "2300", "150", "600", "310"),
    ("2025-02", "10400", "6600", "800", "2450", "160", "600", "330"),
    ("2025-03", "11250", "7100", "840", "2600", "170", "600", "356"),
    ("2025-04", "11900", "7500", "880", "2750", "180", "600", "372"),
    ("2025-05", "12600", "7900", "920", "2900", "190", "600", "395"),
    ("2025-06", "13400", "8400", "960", "3100", "200", "600", "418"),
];

const SAMPLE_PURCHASES: [(&str, &str, &str, &str, &str); 2] = [
    ("2025-06-03", "Shenzhen Widget Co", "COGS", "1850.00", "PO-1042 restock"),
    ("2025-06-17", "Amazon Ads", "PPC", "420.00", "June campaign top-up"),
];

pub fn sample_history() -> Vec<RawHistoryRow> {
    SAMPLE_HISTORY
        .iter()
        .map(|(month, rev, cogs, ppc, fees, other, fixed, orders)| RawHistoryRow {
            month: Some((*month).to_string()),
            revenue: Some((*rev).to_string()),
            cogs_sold: Some((*cogs).to_string()),
            ppc: Some((*ppc).to_string()),
            amazon_fees: Some((*fees).to_string()),
            other_variable: Some((*other).to_string()),
            fixed_costs: Some((*fixed).to_string()),
            orders: Some((*orders).to_string()),
        })
        .collect()
}

pub fn sample_purchases() -> Vec<RawPurchaseRow> {
    SAMPLE_PURCHASES
        .iter()
        .map(|(date, supplier, category, amount, notes)| RawPurchaseRow {
            date: Some((*date).to_string()),
            supplier: Some((*supplier).to_string()),
            category: Some((*category).to_string()),
            amount_gbp: Some((*amount).to_string()),
            notes: Some((*notes).to_string()),
        })
        .collect()
}
