use crate::core::error::AppResult;
use crate::core::model::PaymentView;
use crate::core::validation::{NewPayment, PaymentPatch};
use crate::server::extract::{JsonBody, QueryParams, path_id};
use crate::server::state::AppState;
use crate::services::PaymentDeleted;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

/// `?month=YYYY-MM`
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<MonthQuery>,
) -> AppResult<Json<Vec<PaymentView>>> {
    Ok(Json(state.payments.list(query.month.as_deref()).await?))
}

pub async fn list_for_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    QueryParams(query): QueryParams<MonthQuery>,
) -> AppResult<Json<Vec<PaymentView>>> {
    let tenant_id = path_id(&tenant_id)?;
    let payments = state
        .payments
        .list_for_tenant(&tenant_id, query.month.as_deref())
        .await?;
    Ok(Json(payments))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentView>> {
    let id = path_id(&id)?;
    Ok(Json(state.payments.get(&id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewPayment>,
) -> AppResult<(StatusCode, Json<PaymentView>)> {
    let payment = state.payments.create(input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<PaymentPatch>,
) -> AppResult<Json<PaymentView>> {
    let id = path_id(&id)?;
    Ok(Json(state.payments.update(&id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentDeleted>> {
    let id = path_id(&id)?;
    Ok(Json(state.payments.delete(&id).await?))
}
