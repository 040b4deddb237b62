//! Read-side aggregates: dashboard cards and the tenant x month grid

use crate::core::error::{AppResult, ValidationError};
use crate::core::ledger::{self, DashboardSummary, LedgerGrid};
use crate::core::month::MonthKey;
use crate::core::store::{PaymentFilter, RentStore};
use crate::core::validation::validators;
use chrono::Utc;
use std::sync::Arc;

/// Upper bound on the number of months a single grid request may ask for
pub const MAX_LEDGER_MONTHS: usize = 24;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RentStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RentStore>) -> Self {
        Self { store }
    }

    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let tenants = self.store.list_tenants().await?;
        let payments = self.store.find_payments(&PaymentFilter::all()).await?;
        Ok(ledger::summarize(&tenants, payments))
    }

    /// Build the payment grid
    ///
    /// `months` is a comma separated list of `YYYY-MM` keys. When it is absent
    /// or blank, the `window` months ending at the current month are used.
    pub async fn ledger(&self, months: Option<&str>, window: usize) -> AppResult<LedgerGrid> {
        let months = match months.map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => parse_months(raw)?,
            None => MonthKey::from_date(Utc::now().date_naive()).window_ending(window),
        };

        let tenants = self.store.list_tenants().await?;
        let payments = self.store.find_payments(&PaymentFilter::all()).await?;
        tracing::debug!(months = months.len(), tenants = tenants.len(), "ledger built");
        Ok(ledger::ledger_grid(&tenants, &payments, &months))
    }
}

fn parse_months(raw: &str) -> Result<Vec<MonthKey>, ValidationError> {
    let months = raw
        .split(',')
        .map(|part| validators::month(part.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    if months.len() > MAX_LEDGER_MONTHS {
        return Err(ValidationError::field(
            "months",
            &format!("At most {} months can be requested", MAX_LEDGER_MONTHS),
        ));
    }
    Ok(months)
}
