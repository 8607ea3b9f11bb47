mod config;
mod engine;
mod loader;
mod models;
mod normalize;
mod pipeline;
mod storage;
mod utils;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::engine::{compute_required_spend, EPSILON};
use crate::models::EfficiencyProfile;
use crate::pipeline::Snapshot;
use crate::storage::{HistoryDraft, PurchasesDraft, TableStore};
use crate::utils::{fmt_gbp, fmt_opt_gbp, fmt_opt_pct};

#[derive(Parser)]
#[command(name = "fba-spend", about = "FBA spend-to-profit companion", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Full dashboard: KPIs, spend targets and month progress
    Dashboard {
        /// Emit the whole snapshot as JSON for an external UI
        #[arg(long)]
        json: bool,
    },

    /// Required spend this month under each estimation method
    Targets,

    /// Current-month COGS purchases vs the blended target
    Progress,

    /// Normalized history table with derived metrics
    History,

    /// Required spend across a grid of ROI and realization assumptions
    Sensitivity,

    /// Write the sample tables to the data directory
    Seed,

    /// Replace the whole history table from a CSV file
    ImportHistory {
        /// Path to a CSV with the history schema
        file: PathBuf,
    },

    /// Replace the whole purchase log from a CSV file
    ImportPurchases {
        /// Path to a CSV with the purchases schema
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "fba_spend_companion=info,warn",
        1 => "fba_spend_companion=debug,info",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;
    let store = TableStore::new(
        config.storage.history_path.clone(),
        config.storage.purchases_path.clone(),
    );
    let today = Utc::now().date_naive();

    match cli.command {
        Command::Dashboard { json } => {
            let _t = utils::Timer::start("Dashboard");
            let snap = Snapshot::build(&config, &store, today)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snap)?);
                return Ok(());
            }

            let (rev, net) = snap
                .last_month()
                .map(|r| (Some(r.revenue), Some(r.net_profit)))
                .unwrap_or((None, None));

            println!("──────────────────────────────────────────");
            println!("  FBA Spend Companion");
            println!("──────────────────────────────────────────");
            println!("  Last month revenue    : {}", fmt_opt_gbp(rev));
            println!("  Last month net profit : {}", fmt_opt_gbp(net));
            println!(
                "  Avg ROI on spend ({}m)  : {}",
                config.engine.rolling_n,
                fmt_opt_pct(snap.profile.avg_roi)
            );
            println!(
                "  Avg margin on revenue : {}",
                fmt_opt_pct(snap.profile.avg_margin)
            );
            println!(
                "  Avg revenue ÷ spend   : {}",
                snap.profile
                    .avg_rev_to_spend
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "—".into())
            );
            println!("──────────────────────────────────────────");
            print_targets(&snap);
            println!("──────────────────────────────────────────");
            print_progress(&snap);
            if snap.flagged_rows > 0 {
                println!(
                    "  ⚠ {} history row(s) have an unparseable month",
                    snap.flagged_rows
                );
            }
            println!("──────────────────────────────────────────");
        }

        Command::Targets => {
            let snap = Snapshot::build(&config, &store, today)?;
            print_targets(&snap);
        }

        Command::Progress => {
            let snap = Snapshot::build(&config, &store, today)?;
            print_progress(&snap);
        }

        Command::History => {
            let snap = Snapshot::build(&config, &store, today)?;
            println!(
                "{:<10} {:>10} {:>10} {:>8} {:>10} {:>8} {:>8} {:>7} {:>10} {:>8} {:>8} {:>6}",
                "Month", "Revenue", "COGS", "PPC", "Fees", "Other", "Fixed",
                "Orders", "Net", "ROI", "Margin", "Turn",
            );
            for r in &snap.history {
                let month = r
                    .month
                    .map(|m| m.format("%Y-%m").to_string())
                    .unwrap_or_else(|| "INVALID".into());
                println!(
                    "{:<10} {:>10} {:>10} {:>8} {:>10} {:>8} {:>8} {:>7} {:>10} {:>8} {:>8} {:>6}",
                    month,
                    fmt_gbp(r.revenue),
                    fmt_gbp(r.cogs_sold),
                    fmt_gbp(r.ppc),
                    fmt_gbp(r.amazon_fees),
                    fmt_gbp(r.other_variable),
                    fmt_gbp(r.fixed_costs),
                    r.orders,
                    fmt_gbp(r.net_profit),
                    fmt_opt_pct(r.roi_on_spend),
                    fmt_opt_pct(r.margin_on_revenue),
                    r.rev_to_spend
                        .map(|v| format!("{:.2}", v))
                        .unwrap_or_else(|| "—".into()),
                );
            }
        }

        Command::Sensitivity => {
            let snap = Snapshot::build(&config, &store, today)?;
            let e = &config.engine;
            let funding = e.target_profit + e.fixed_costs;

            println!("Required spend by assumed ROI (realization {:.0}%):", e.realization * 100.0);
            for roi in [0.25, 0.35, 0.45, 0.55, 0.65] {
                let spend = funding / (roi * e.realization).max(EPSILON) * (1.0 + e.buffer);
                println!("  ROI {:>4.0}%  →  {}", roi * 100.0, fmt_gbp(spend));
            }

            println!("Required spend by realization (avg ROI {}):", fmt_opt_pct(snap.profile.avg_roi));
            for realization in [0.4, 0.5, 0.6, 0.7, 0.8] {
                let profile = EfficiencyProfile {
                    avg_roi: snap.profile.avg_roi,
                    ..EfficiencyProfile::UNDEFINED
                };
                let t = compute_required_spend(
                    e.target_profit,
                    e.fixed_costs,
                    &profile,
                    realization,
                    e.buffer,
                );
                println!("  Realization {:>3.0}%  →  {}", realization * 100.0, fmt_gbp(t.spend_roi));
            }
        }

        Command::Seed => {
            store.seed_files()?;
            println!(
                "Sample tables written to {:?} and {:?}.",
                store.history_path(),
                store.purchases_path()
            );
        }

        Command::ImportHistory { file } => {
            let _t = utils::Timer::start("History import");
            let draft = HistoryDraft::from_csv(&file)?;
            info!("{} rows staged from {:?}", draft.rows.len(), file);
            draft.commit(&store)?;
            println!("History replaced: {} rows.", draft.rows.len());
        }

        Command::ImportPurchases { file } => {
            let _t = utils::Timer::start("Purchases import");
            let draft = PurchasesDraft::from_csv(&file)?;
            info!("{} rows staged from {:?}", draft.rows.len(), file);
            draft.commit(&store)?;
            println!("Purchases replaced: {} rows.", draft.rows.len());
        }
    }

    Ok(())
}

fn print_targets(snap: &Snapshot) {
    println!("  Required spend this month");
    println!("    ROI-on-spend method   : {}", fmt_gbp(snap.targets.spend_roi));
    println!("    Margin × turn method  : {}", fmt_gbp(snap.targets.spend_margin));
    println!("    Blended (geo mean)    : {}", fmt_opt_gbp(snap.targets.spend_blended));
}

fn print_progress(snap: &Snapshot) {
    println!(
        "  This month ({}) COGS purchases: {}",
        snap.progress.month_start.format("%Y-%m"),
        fmt_gbp(snap.progress.month_spend)
    );
    match snap.progress.target_blended {
        Some(target) => println!(
            "  Blended target: {}  (spent − target = {})",
            fmt_gbp(target),
            fmt_gbp(snap.progress.month_spend - target)
        ),
        None => println!("  Blended target: —"),
    }
}
