//! HTTP handlers for the `/api` routes
//!
//! Handlers stay thin: parse the path and body, call a service, and let
//! [`AppError`](crate::core::error::AppError) render failures.

pub mod dashboard;
pub mod payments;
pub mod tenants;
