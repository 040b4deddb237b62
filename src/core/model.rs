//! Tenant and payment records plus their read-side views

use crate::core::entity::Entity;
use crate::core::month::MonthKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A renter occupying a flat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub flat_no: String,
    pub rent_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Create a tenant with a fresh id and timestamps
    pub fn new(name: String, phone: Option<String>, flat_no: String, rent_amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            flat_no,
            rent_amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// The subset of fields attached to payments for display
    pub fn summary(&self) -> TenantSummary {
        TenantSummary {
            id: self.id,
            name: self.name.clone(),
            flat_no: self.flat_no.clone(),
            rent_amount: self.rent_amount,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Tenant {
    fn collection_name() -> &'static str {
        "tenants"
    }

    fn display_name() -> &'static str {
        "Tenant"
    }

    fn not_found_code() -> &'static str {
        "TENANT_NOT_FOUND"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// An amount paid by a tenant for one billing month
///
/// At most one payment exists per `(tenant_id, month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub month: MonthKey,
    pub paid_amount: f64,
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Create a payment with a fresh id and timestamps
    pub fn new(
        tenant_id: Uuid,
        month: MonthKey,
        paid_amount: f64,
        payment_date: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            month,
            paid_amount,
            payment_date: payment_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether this payment occupies the given `(tenant, month)` slot
    pub fn occupies(&self, tenant_id: &Uuid, month: &MonthKey) -> bool {
        &self.tenant_id == tenant_id && &self.month == month
    }
}

impl Entity for Payment {
    fn collection_name() -> &'static str {
        "payments"
    }

    fn display_name() -> &'static str {
        "Payment"
    }

    fn not_found_code() -> &'static str {
        "PAYMENT_NOT_FOUND"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Tenant details attached to a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantSummary {
    pub id: Uuid,
    pub name: String,
    pub flat_no: String,
    pub rent_amount: f64,
}

/// Settlement state of a payment against the tenant's current rent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// The paid amount covers the rent
    Paid,
    /// Part of the rent is still outstanding
    Due,
}

/// A payment as returned over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    pub tenant: Option<TenantSummary>,
    pub status: PaymentStatus,
    pub amount_due: f64,
}
