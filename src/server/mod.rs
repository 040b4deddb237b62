//! HTTP server for the rent ledger
//!
//! `ServerBuilder` wires a store into the services and produces an axum
//! `Router` exposing:
//! - the `/api` routes for tenants, payments, the dashboard and the ledger grid
//! - `/health` and `/healthz`
//! - the dashboard page at `/`

pub mod builder;
pub mod client;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use extract::{JsonBody, QueryParams};
pub use state::AppState;
