//! Rent-due, payment status and dashboard computations
//!
//! Everything here is pure: callers load tenants and payments from a store
//! and these functions derive the read-side numbers from them.

use crate::core::model::{Payment, PaymentStatus, PaymentView, Tenant, TenantSummary};
use crate::core::month::MonthKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Number of payments listed on the dashboard
pub const RECENT_PAYMENTS_LIMIT: usize = 5;

/// Rent still owed for a month, floored at zero
pub fn amount_due(rent_amount: f64, paid_amount: Option<f64>) -> f64 {
    (rent_amount - paid_amount.unwrap_or(0.0)).max(0.0)
}

/// Status of a payment given the tenant's rent
pub fn payment_status(rent_amount: f64, paid_amount: f64) -> PaymentStatus {
    if paid_amount < rent_amount {
        PaymentStatus::Due
    } else {
        PaymentStatus::Paid
    }
}

/// Attach tenant details and derived fields to a payment.
///
/// A payment whose tenant no longer resolves is reported as due with
/// nothing outstanding.
pub fn payment_view(payment: Payment, tenant: Option<&Tenant>) -> PaymentView {
    match tenant {
        Some(tenant) => PaymentView {
            status: payment_status(tenant.rent_amount, payment.paid_amount),
            amount_due: amount_due(tenant.rent_amount, Some(payment.paid_amount)),
            tenant: Some(tenant.summary()),
            payment,
        },
        None => PaymentView {
            payment,
            tenant: None,
            status: PaymentStatus::Due,
            amount_due: 0.0,
        },
    }
}

/// Build views for a batch of payments using a tenant lookup
pub fn payment_views(payments: Vec<Payment>, tenants: &[Tenant]) -> Vec<PaymentView> {
    let by_id = index_tenants(tenants);
    payments
        .into_iter()
        .map(|payment| {
            let tenant = by_id.get(&payment.tenant_id).copied();
            payment_view(payment, tenant)
        })
        .collect()
}

fn index_tenants(tenants: &[Tenant]) -> HashMap<Uuid, &Tenant> {
    tenants.iter().map(|t| (t.id, t)).collect()
}

/// Aggregates shown on the dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_tenants: u64,
    /// Sum of `paid_amount` over every stored payment
    pub total_payments: f64,
    pub pending_payments_count: u64,
    pub pending_amount: f64,
    pub recent_payments: Vec<PaymentView>,
}

/// Compute the dashboard in one pass over the payments
pub fn summarize(tenants: &[Tenant], payments: Vec<Payment>) -> DashboardSummary {
    let by_id = index_tenants(tenants);

    let mut total_payments = 0.0;
    let mut pending_payments_count = 0;
    let mut pending_amount = 0.0;
    let mut views = Vec::with_capacity(payments.len());

    for payment in payments {
        let tenant = by_id.get(&payment.tenant_id).copied();
        let view = payment_view(payment, tenant);
        total_payments += view.payment.paid_amount;
        if view.status == PaymentStatus::Due {
            pending_payments_count += 1;
        }
        pending_amount += view.amount_due;
        views.push(view);
    }

    views.sort_by(|a, b| b.payment.payment_date.cmp(&a.payment.payment_date));
    views.truncate(RECENT_PAYMENTS_LIMIT);

    DashboardSummary {
        total_tenants: tenants.len() as u64,
        total_payments,
        pending_payments_count,
        pending_amount,
        recent_payments: views,
    }
}

/// One tenant x month cell of the ledger grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerCell {
    pub month: MonthKey,
    pub payment_id: Option<Uuid>,
    pub paid_amount: Option<f64>,
    pub amount_due: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub tenant: TenantSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub cells: Vec<LedgerCell>,
}

/// Payment grid for a set of months, one row per tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerGrid {
    pub months: Vec<MonthKey>,
    pub rows: Vec<LedgerRow>,
}

/// Lay out payments as a tenant x month grid
pub fn ledger_grid(tenants: &[Tenant], payments: &[Payment], months: &[MonthKey]) -> LedgerGrid {
    let slots: HashMap<(Uuid, &MonthKey), &Payment> = payments
        .iter()
        .map(|p| ((p.tenant_id, &p.month), p))
        .collect();

    let rows = tenants
        .iter()
        .map(|tenant| {
            let cells = months
                .iter()
                .map(|month| {
                    let payment = slots.get(&(tenant.id, month));
                    let paid_amount = payment.map(|p| p.paid_amount);
                    LedgerCell {
                        month: month.clone(),
                        payment_id: payment.map(|p| p.id),
                        paid_amount,
                        amount_due: amount_due(tenant.rent_amount, paid_amount),
                    }
                })
                .collect();
            LedgerRow {
                tenant: tenant.summary(),
                phone: tenant.phone.clone(),
                cells,
            }
        })
        .collect();

    LedgerGrid {
        months: months.to_vec(),
        rows,
    }
}
