//! Persisted-table store: the two CSV tables, seed fallback, and
//! whole-table replace on save.
//!
//! Saves never patch rows. An edit session builds a draft of the complete
//! table and commits it, which writes a temp file next to the target and
//! renames it into place. The rename keeps a concurrent reader from ever
//! seeing a half-written table.

use crate::loader::{read_history_csv, read_purchases_csv};
use crate::models::{RawHistoryRow, RawPurchaseRow};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod seed;

pub struct TableStore {
    history_path: PathBuf,
    purchases_path: PathBuf,
}

impl TableStore {
    pub fn new(history_path: impl Into<PathBuf>, purchases_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
            purchases_path: purchases_path.into(),
        }
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn purchases_path(&self) -> &Path {
        &self.purchases_path
    }

    /// Load the raw history table, or the documented sample when no file
    /// has been persisted yet. A missing table is not an error — the rest
    /// of the pipeline always gets non-empty input.
    pub fn load_history(&self) -> Result<Vec<RawHistoryRow>> {
        if !self.history_path.exists() {
            warn!("{:?} not found — using sample history", self.history_path);
            return Ok(seed::sample_history());
        }
        read_history_csv(&self.history_path)
    }

    /// Load the raw purchase log, or the sample when missing.
    pub fn load_purchases(&self) -> Result<Vec<RawPurchaseRow>> {
        if !self.purchases_path.exists() {
            warn!("{:?} not found — using sample purchases", self.purchases_path);
            return Ok(seed::sample_purchases());
        }
        read_purchases_csv(&self.purchases_path)
    }

    /// Replace history.csv with `rows`. Only the eight source columns are
    /// written; derived metrics are recomputed on load, never persisted.
    pub fn save_history(&self, rows: &[RawHistoryRow]) -> Result<()> {
        write_table(&self.history_path, rows)?;
        info!("Saved {} history rows to {:?}", rows.len(), self.history_path);
        Ok(())
    }

    /// Replace purchases.csv with `rows`.
    pub fn save_purchases(&self, rows: &[RawPurchaseRow]) -> Result<()> {
        write_table(&self.purchases_path, rows)?;
        info!("Saved {} purchase rows to {:?}", rows.len(), self.purchases_path);
        Ok(())
    }

    /// Materialize the sample tables on disk. Refuses to clobber existing
    /// data; use the import commands to replace a table deliberately.
    pub fn seed_files(&self) -> Result<()> {
        if self.history_path.exists() || self.purchases_path.exists() {
            anyhow::bail!(
                "Refusing to seed: {:?} or {:?} already exists",
                self.history_path,
                self.purchases_path
            );
        }
        self.save_history(&seed::sample_history())?;
        self.save_purchases(&seed::sample_purchases())?;
        Ok(())
    }
}

/// Atomic whole-table write: temp file in the same directory, then rename.
fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create dir {:?}", parent))?;
        }
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)
            .with_context(|| format!("Could not write {:?}", tmp))?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("Could not replace {:?}", path))?;
    Ok(())
}

// ── Edit-session drafts ───────────────────────────────────────────────────────

/// A full replacement table staged for an explicit commit. Mirrors the
/// edit-then-save flow of the data manager page: mutate the draft freely,
/// nothing touches disk until `commit`.
#[derive(Debug, Clone, Default)]
pub struct HistoryDraft {
    pub rows: Vec<RawHistoryRow>,
}

impl HistoryDraft {
    pub fn from_csv(path: &Path) -> Result<Self> {
        Ok(Self { rows: read_history_csv(path)? })
    }

    pub fn commit(&self, store: &TableStore) -> Result<()> {
        store.save_history(&self.rows)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PurchasesDraft {
    pub rows: Vec<RawPurchaseRow>,
}

impl PurchasesDraft {
    pub fn from_csv(path: &Path) -> Result<Self> {
        Ok(Self { rows: read_purchases_csv(path)? })
    }

    pub fn push(&mut self, row: RawPurchaseRow) {
        self.rows.push(row);
    }

    pub fn commit(&self, store: &TableStore) -> Result<()> {
        store.save_purchases(&self.rows)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_history, normalize_purchases};

    fn temp_store() -> (tempfile::TempDir, TableStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(
            dir.path().join("history.csv"),
            dir.path().join("purchases.csv"),
        );
        (dir, store)
    }

    #[test]
    fn test_missing_files_fall_back_to_sample() {
        let (_dir, store) = temp_store();
        let hist = store.load_history().unwrap();
        let purch = store.load_purchases().unwrap();
        assert_eq!(hist.len(), 6);
        assert_eq!(purch.len(), 2);
        // The sample must survive normalization with every month parseable.
        let recs = normalize_history(&hist);
        assert!(recs.iter().all(|r| r.month.is_some()));
        assert_eq!(normalize_purchases(&purch).len(), 2);
    }

    #[test]
    fn test_save_then_load_replaces_whole_table() {
        let (_dir, store) = temp_store();
        store.save_history(&seed::sample_history()).unwrap();

        let draft = HistoryDraft {
            rows: vec![RawHistoryRow {
                month: Some("2025-07".into()),
                revenue: Some("14000".into()),
                ..Default::default()
            }],
        };
        draft.commit(&store).unwrap();

        let rows = store.load_history().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month.as_deref(), Some("2025-07"));
        // no leftover temp file
        assert!(!store.history_path().with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_seed_refuses_to_overwrite() {
        let (_dir, store) = temp_store();
        store.seed_files().unwrap();
        assert!(store.seed_files().is_err());
    }
}
