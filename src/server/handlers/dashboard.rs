use crate::core::error::AppResult;
use crate::core::ledger::{DashboardSummary, LedgerGrid};
use crate::server::extract::QueryParams;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde::Deserialize;

pub async fn summary(State(state): State<AppState>) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(state.dashboard.summary().await?))
}

/// `?months=YYYY-MM,YYYY-MM,...`
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub months: Option<String>,
}

pub async fn ledger(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LedgerQuery>,
) -> AppResult<Json<LedgerGrid>> {
    let window = state.config.ledger.window_months;
    let grid = state
        .dashboard
        .ledger(query.months.as_deref(), window)
        .await?;
    Ok(Json(grid))
}
