//! The estimation engine: pure functions from normalized tables to spend
//! targets. No I/O here — loading and persistence live in `loader`/`storage`,
//! and everything below recomputes from scratch on each call.

pub mod progress;
pub mod rolling;
pub mod solver;

pub use progress::{current_month_spend, month_bounds, ProgressReport};
pub use rolling::rolling_avgs;
pub use solver::{compute_required_spend, EPSILON};
