use crate::core::error::AppResult;
use crate::core::model::Tenant;
use crate::core::validation::{NewTenant, TenantPatch};
use crate::server::extract::{JsonBody, path_id};
use crate::server::state::AppState;
use crate::services::TenantDeleted;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Tenant>>> {
    Ok(Json(state.tenants.list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewTenant>,
) -> AppResult<(StatusCode, Json<Tenant>)> {
    let tenant = state.tenants.create(input).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Tenant>> {
    let id = path_id(&id)?;
    Ok(Json(state.tenants.get(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<TenantPatch>,
) -> AppResult<Json<Tenant>> {
    let id = path_id(&id)?;
    Ok(Json(state.tenants.update(&id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TenantDeleted>> {
    let id = path_id(&id)?;
    Ok(Json(state.tenants.delete(&id).await?))
}
