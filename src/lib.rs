//! # Rent Ledger
//!
//! Rent management for a small building: tenants, one payment per tenant per
//! month, and a dashboard summarizing what has been received and what is
//! still due.
//!
//! ## Features
//!
//! - **Tenant records**: name, optional phone, flat number, monthly rent
//! - **Monthly payments**: unique per `(tenant, YYYY-MM)`, enforced by the store
//! - **Derived status**: `paid` or `due` computed from the tenant's current rent
//! - **Dashboard**: totals, pending count and amount, five most recent payments
//! - **Ledger grid**: tenant x month view feeding the bundled browser client
//! - **Pluggable storage**: in-memory, or MongoDB behind `mongodb_backend`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rent_ledger::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryStore::new())
//!         .with_config(AppConfig::default())
//!         .serve("0.0.0.0:5000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::Entity,
        error::{AppError, AppResult, EntityError, PaymentError, StorageError, ValidationError},
        ledger::{DashboardSummary, LedgerCell, LedgerGrid, LedgerRow},
        model::{Payment, PaymentStatus, PaymentView, Tenant, TenantSummary},
        month::MonthKey,
        store::{PaymentFilter, PaymentStore, RentStore, StoreError, StoreResult, TenantStore},
        validation::{NewPayment, NewTenant, PaymentPatch, TenantPatch},
    };

    // === Services ===
    pub use crate::services::{
        DashboardService, PaymentDeleted, PaymentService, TenantDeleted, TenantService,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;

    // === Config ===
    pub use crate::config::{AppConfig, LedgerConfig, ServerConfig, StorageConfig};

    // === Server ===
    pub use crate::server::{AppState, JsonBody, QueryParams, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
