use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Categories the editing surface offers for purchases. The engine passes
/// category strings through verbatim; this list is for UIs that want a picker.
pub const KNOWN_CATEGORIES: [&str; 4] = ["COGS", "PPC", "Fees", "Other"];

/// Category summed by the current-month progress gauge.
pub const COGS_CATEGORY: &str = "COGS";

// ── Monthly history ───────────────────────────────────────────────────────────

/// One month of trading actuals, with derived efficiency metrics.
///
/// `month` is the first calendar day of the month, or `None` when the
/// persisted month token could not be parsed — flagged rows stay in the
/// table so callers can surface them instead of undercounting history.
///
/// The three ratio fields are `None` whenever their denominator is not
/// positive. They are never 0 or NaN in that case; downstream averaging
/// skips them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRecord {
    pub month: Option<NaiveDate>,
    pub revenue: f64,
    pub cogs_sold: f64,
    pub ppc: f64,
    pub amazon_fees: f64,
    pub other_variable: f64,
    pub fixed_costs: f64,
    pub orders: u32,
    // Derived — recomputed on every load, never persisted.
    pub core_profit: f64,
    pub net_profit: f64,
    pub roi_on_spend: Option<f64>,
    pub margin_on_revenue: Option<f64>,
    pub rev_to_spend: Option<f64>,
}

// ── Purchase log ──────────────────────────────────────────────────────────────

/// One logged expenditure from the purchases table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseEntry {
    pub date: NaiveDate,
    pub supplier: String,
    pub category: String,
    pub amount_gbp: f64,
    pub notes: String,
}

// ── Engine outputs ────────────────────────────────────────────────────────────

/// Trailing-window mean of each efficiency ratio. Each mean is independently
/// `None` when no row in the window had a defined value for that field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct EfficiencyProfile {
    pub avg_roi: Option<f64>,
    pub avg_margin: Option<f64>,
    pub avg_rev_to_spend: Option<f64>,
}

impl EfficiencyProfile {
    pub const UNDEFINED: Self = Self {
        avg_roi: None,
        avg_margin: None,
        avg_rev_to_spend: None,
    };
}

/// Required spend this month under each estimation method.
///
/// `spend_blended` is the geometric mean of the two method estimates and is
/// `None` when either estimate is negative (no real root to take).
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SpendTargets {
    pub spend_roi: f64,
    pub spend_margin: f64,
    pub spend_blended: Option<f64>,
}

// ── Raw CSV rows ──────────────────────────────────────────────────────────────

/// history.csv: Month, Revenue, COGS_Sold, PPC, Amazon_Fees, Other_Variable,
/// Fixed_Costs, Orders
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawHistoryRow {
    #[serde(rename = "Month")]
    pub month: Option<String>,
    #[serde(rename = "Revenue")]
    pub revenue: Option<String>,
    #[serde(rename = "COGS_Sold")]
    pub cogs_sold: Option<String>,
    #[serde(rename = "PPC")]
    pub ppc: Option<String>,
    #[serde(rename = "Amazon_Fees")]
    pub amazon_fees: Option<String>,
    #[serde(rename = "Other_Variable")]
    pub other_variable: Option<String>,
    #[serde(rename = "Fixed_Costs")]
    pub fixed_costs: Option<String>,
    #[serde(rename = "Orders")]
    pub orders: Option<String>,
}

/// purchases.csv: Date, Supplier, Category, AmountGBP, Notes
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPurchaseRow {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Supplier")]
    pub supplier: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "AmountGBP")]
    pub amount_gbp: Option<String>,
    #[serde(rename = "Notes")]
    pub notes: Option<String>,
}
