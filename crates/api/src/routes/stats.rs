//! Statistics and dashboard routes.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extractors::ApiQuery;
use crate::{AppState, middleware::AuthUser};
use coinkeeper_core::stats::{DEFAULT_RECENT, Dashboard, Period, PeriodSummary};

/// Largest accepted `recent` value.
const MAX_RECENT: usize = 50;

/// Creates the statistics routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(period_stats))
        .route("/dashboard", get(dashboard))
}

/// Query parameters for period statistics.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// `week`, `month` (default), `year`, or `custom`.
    pub period: Option<String>,
    /// First day of a custom period.
    pub from: Option<NaiveDate>,
    /// Last day of a custom period.
    pub to: Option<NaiveDate>,
}

/// Query parameters for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Number of recent transactions.
    pub recent: Option<usize>,
}

/// GET `/stats` - Totals and breakdowns for a period.
async fn period_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<Json<PeriodSummary>, ApiError> {
    let period = Period::parse(
        query.period.as_deref().unwrap_or("month"),
        query.from,
        query.to,
    )?;
    let today = Utc::now().date_naive();
    Ok(Json(
        state
            .ledger
            .period_summary(auth.user_id(), period, today)
            .await?,
    ))
}

/// GET `/dashboard` - Balances, this month's totals, and recent activity.
async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let recent = query.recent.unwrap_or(DEFAULT_RECENT).min(MAX_RECENT);
    let today = Utc::now().date_naive();
    Ok(Json(
        state
            .ledger
            .dashboard(auth.user_id(), today, recent, &state.currency)
            .await?,
    ))
}
