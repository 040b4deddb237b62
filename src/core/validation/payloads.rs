//! Request payloads for tenants and payments
//!
//! Every field is optional at the serde level so that a missing field is
//! reported as a validation error rather than a JSON decoding failure.

use super::validators;
use crate::core::error::ValidationError;
use crate::core::model::{Payment, Tenant};
use crate::core::month::MonthKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TENANT_REQUIRED_MESSAGE: &str = "Name, Flat No, and Rent Amount required";
const PAYMENT_REQUIRED_MESSAGE: &str = "Tenant and Month are required";

/// Body of `POST /api/tenants`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTenant {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub flat_no: Option<String>,
    pub rent_amount: Option<f64>,
}

impl NewTenant {
    /// Check required fields and build the tenant to insert
    pub fn validate(self) -> Result<Tenant, ValidationError> {
        let name = validators::required_text(self.name);
        let flat_no = validators::required_text(self.flat_no);

        let (Some(name), Some(flat_no), Some(rent_amount)) = (name, flat_no, self.rent_amount)
        else {
            return Err(ValidationError::MissingFields {
                fields: vec![
                    "name".to_string(),
                    "flat_no".to_string(),
                    "rent_amount".to_string(),
                ],
                message: TENANT_REQUIRED_MESSAGE.to_string(),
            });
        };

        let rent_amount = validators::non_negative("rent_amount", "Rent Amount", rent_amount)?;
        let phone = validators::optional_text(self.phone);

        Ok(Tenant::new(name, phone, flat_no, rent_amount))
    }
}

/// Body of `PUT /api/tenants/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub flat_no: Option<String>,
    pub rent_amount: Option<f64>,
}

impl TenantPatch {
    /// Validate the supplied fields and apply them to `tenant`
    ///
    /// Uses the same rules as creation. A blank phone clears it.
    pub fn apply(self, tenant: &mut Tenant) -> Result<(), ValidationError> {
        if let Some(raw) = self.name {
            tenant.name = validators::required_text(Some(raw))
                .ok_or_else(|| ValidationError::field("name", "Name cannot be empty"))?;
        }
        if let Some(raw) = self.flat_no {
            tenant.flat_no = validators::required_text(Some(raw))
                .ok_or_else(|| ValidationError::field("flat_no", "Flat No cannot be empty"))?;
        }
        if let Some(rent) = self.rent_amount {
            tenant.rent_amount = validators::non_negative("rent_amount", "Rent Amount", rent)?;
        }
        if self.phone.is_some() {
            tenant.phone = validators::optional_text(self.phone);
        }
        tenant.touch();
        Ok(())
    }
}

/// Body of `POST /api/payments`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPayment {
    pub tenant_id: Option<String>,
    pub month: Option<String>,
    pub paid_amount: Option<f64>,
    pub payment_date: Option<String>,
}

/// A checked [`NewPayment`]; the tenant still has to be resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ValidNewPayment {
    pub tenant_id: Uuid,
    pub month: MonthKey,
    pub paid_amount: f64,
    pub payment_date: Option<DateTime<Utc>>,
}

impl NewPayment {
    pub fn validate(self) -> Result<ValidNewPayment, ValidationError> {
        let tenant_id = validators::required_text(self.tenant_id);
        let month = validators::present(self.month);

        let (Some(tenant_id), Some(month)) = (tenant_id, month) else {
            return Err(ValidationError::MissingFields {
                fields: vec!["tenant_id".to_string(), "month".to_string()],
                message: PAYMENT_REQUIRED_MESSAGE.to_string(),
            });
        };

        let month = validators::month(&month)?;
        let paid_amount =
            validators::non_negative("paid_amount", "Paid amount", self.paid_amount.unwrap_or(0.0))?;
        let tenant_id = validators::uuid(&tenant_id)?;
        let payment_date = self
            .payment_date
            .as_deref()
            .map(validators::payment_date)
            .transpose()?;

        Ok(ValidNewPayment {
            tenant_id,
            month,
            paid_amount,
            payment_date,
        })
    }
}

impl ValidNewPayment {
    pub fn into_payment(self) -> Payment {
        Payment::new(self.tenant_id, self.month, self.paid_amount, self.payment_date)
    }
}

/// Body of `PUT /api/payments/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentPatch {
    pub tenant_id: Option<String>,
    pub month: Option<String>,
    pub paid_amount: Option<f64>,
    pub payment_date: Option<String>,
}

/// A checked [`PaymentPatch`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidPaymentPatch {
    pub tenant_id: Option<Uuid>,
    pub month: Option<MonthKey>,
    pub paid_amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl PaymentPatch {
    pub fn validate(self) -> Result<ValidPaymentPatch, ValidationError> {
        let month = self.month.as_deref().map(validators::month).transpose()?;
        let paid_amount = self
            .paid_amount
            .map(|v| validators::non_negative("paid_amount", "Paid amount", v))
            .transpose()?;
        let tenant_id = self
            .tenant_id
            .as_deref()
            .map(validators::uuid)
            .transpose()?;
        let payment_date = self
            .payment_date
            .as_deref()
            .map(validators::payment_date)
            .transpose()?;

        Ok(ValidPaymentPatch {
            tenant_id,
            month,
            paid_amount,
            payment_date,
        })
    }
}

impl ValidPaymentPatch {
    pub fn apply(self, payment: &mut Payment) {
        if let Some(tenant_id) = self.tenant_id {
            payment.tenant_id = tenant_id;
        }
        if let Some(month) = self.month {
            payment.month = month;
        }
        if let Some(paid_amount) = self.paid_amount {
            payment.paid_amount = paid_amount;
        }
        if let Some(payment_date) = self.payment_date {
            payment.payment_date = payment_date;
        }
        payment.touch();
    }
}
