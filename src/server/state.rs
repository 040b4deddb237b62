use crate::config::AppConfig;
use crate::core::store::RentStore;
use crate::services::{DashboardService, PaymentService, TenantService};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tenants: TenantService,
    pub payments: PaymentService,
    pub dashboard: DashboardService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire every service to the same store
    pub fn new(store: Arc<dyn RentStore>, config: AppConfig) -> Self {
        Self {
            tenants: TenantService::new(store.clone()),
            payments: PaymentService::new(store.clone()),
            dashboard: DashboardService::new(store),
            config: Arc::new(config),
        }
    }
}
