//! Snapshot builder: ties storage → normalize → engine together.
//!
//! Everything recomputes in full on every call. The tables are small and the
//! transforms cheap, so there is no cache to go stale between edits.

use crate::config::AppConfig;
use crate::engine::{compute_required_spend, rolling_avgs, ProgressReport};
use crate::models::{
    EfficiencyProfile, MonthlyRecord, PurchaseEntry, SpendTargets, COGS_CATEGORY,
};
use crate::normalize::{normalize_history, normalize_purchases};
use crate::storage::TableStore;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Everything a presentation layer needs to render the dashboard: normalized
/// tables with derived columns, rolling efficiency, the three spend targets,
/// and this month's COGS progress.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub history: Vec<MonthlyRecord>,
    pub purchases: Vec<PurchaseEntry>,
    pub profile: EfficiencyProfile,
    pub targets: SpendTargets,
    pub progress: ProgressReport,
    /// History rows whose month token failed to parse (kept in `history`
    /// with `month: None`).
    pub flagged_rows: usize,
}

impl Snapshot {
    /// Load both tables and run the full estimation pass as of `today` (UTC).
    pub fn build(config: &AppConfig, store: &TableStore, today: NaiveDate) -> Result<Snapshot> {
        let history = normalize_history(&store.load_history()?);
        let purchases = normalize_purchases(&store.load_purchases()?);

        let flagged_rows = history.iter().filter(|r| r.month.is_none()).count();

        // Flagged rows sort after all dated rows; the trailing window is
        // defined chronologically, so it only runs over the dated prefix.
        let dated = &history[..history.len() - flagged_rows];
        let profile = rolling_avgs(dated, config.engine.rolling_n);
        let targets = compute_required_spend(
            config.engine.target_profit,
            config.engine.fixed_costs,
            &profile,
            config.engine.realization,
            config.engine.buffer,
        );
        let progress = ProgressReport::build(&purchases, today, COGS_CATEGORY, &targets);

        debug!(
            "Snapshot: {} months, {} purchases, blended target {:?}",
            history.len(),
            purchases.len(),
            targets.spend_blended
        );

        Ok(Snapshot {
            history,
            purchases,
            profile,
            targets,
            progress,
            flagged_rows,
        })
    }

    /// Most recent month with a valid month key, if any.
    pub fn last_month(&self) -> Option<&MonthlyRecord> {
        self.history.iter().rev().find(|r| r.month.is_some())
    }
}
