//! CSV readers for the two persisted tables.
//!
//! Rows are read into raw string form; all typing and coercion happens in
//! `normalize`. A row the CSV reader itself chokes on is logged and skipped
//! rather than failing the load.

use crate::models::{RawHistoryRow, RawPurchaseRow};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, warn};

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    debug!("Loading {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Could not open {:?}", path))?;

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Row {} in {:?}: {}", i + 1, path, e),
        }
    }
    Ok(rows)
}

/// Read history.csv (Month, Revenue, COGS_Sold, PPC, Amazon_Fees,
/// Other_Variable, Fixed_Costs, Orders).
pub fn read_history_csv(path: &Path) -> Result<Vec<RawHistoryRow>> {
    read_rows(path)
}

/// Read purchases.csv (Date, Supplier, Category, AmountGBP, Notes).
pub fn read_purchases_csv(path: &Path) -> Result<Vec<RawPurchaseRow>> {
    read_rows(path)
}
