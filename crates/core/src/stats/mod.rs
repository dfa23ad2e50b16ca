//! Period statistics and the dashboard.

pub mod service;
pub mod types;

pub use service::{DEFAULT_RECENT, StatsService};
pub use types::{CategoryShare, DailyTotals, Dashboard, DateRange, Period, PeriodSummary};
