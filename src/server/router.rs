//! Route table for the REST API, health checks and the dashboard page

use super::client;
use super::handlers::{dashboard, payments, tenants};
use super::state::AppState;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// Build the full router: API routes, health checks and the dashboard page
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(client::routes())
        .merge(api_routes(state))
}

/// Routes under `/api`
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/tenants", get(tenants::list).post(tenants::create))
        .route(
            "/api/tenants/{id}",
            get(tenants::get).put(tenants::update).delete(tenants::delete),
        )
        .route("/api/payments", get(payments::list).post(payments::create))
        .route(
            "/api/payments/tenant/{tenant_id}",
            get(payments::list_for_tenant),
        )
        .route(
            "/api/payments/{id}",
            get(payments::get)
                .put(payments::update)
                .delete(payments::delete),
        )
        .route("/api/dashboard", get(dashboard::summary))
        .route("/api/ledger", get(dashboard::ledger))
        .with_state(state)
}

/// Build health check routes
fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "rent-ledger"
    }))
}
