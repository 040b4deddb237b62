use crate::core::error::{AppError, AppResult};
use crate::core::ledger;
use crate::core::model::{Payment, PaymentView};
use crate::core::store::{PaymentFilter, RentStore};
use crate::core::validation::validators;
use crate::core::validation::{NewPayment, PaymentPatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const PAYMENT_DELETED_MESSAGE: &str = "Payment deleted successfully";

/// Response body for a payment deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDeleted {
    pub message: String,
}

/// Payment recording and lookup
///
/// Every payment leaving this service is a [`PaymentView`] with the owning
/// tenant attached and its status derived from the tenant's current rent.
#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn RentStore>,
}

impl PaymentService {
    pub fn new(store: Arc<dyn RentStore>) -> Self {
        Self { store }
    }

    /// List payments, optionally restricted to one month
    pub async fn list(&self, month: Option<&str>) -> AppResult<Vec<PaymentView>> {
        let filter = PaymentFilter::all().with_month(validators::optional_month(month)?);
        self.views(&filter).await
    }

    /// List one tenant's payments, optionally restricted to one month
    pub async fn list_for_tenant(
        &self,
        tenant_id: &Uuid,
        month: Option<&str>,
    ) -> AppResult<Vec<PaymentView>> {
        let filter =
            PaymentFilter::for_tenant(*tenant_id).with_month(validators::optional_month(month)?);
        self.views(&filter).await
    }

    async fn views(&self, filter: &PaymentFilter) -> AppResult<Vec<PaymentView>> {
        let payments = self.store.find_payments(filter).await?;
        let tenants = self.store.list_tenants().await?;
        tracing::debug!(count = payments.len(), "payments listed");
        Ok(ledger::payment_views(payments, &tenants))
    }

    async fn view(&self, payment: Payment) -> AppResult<PaymentView> {
        let tenant = self.store.get_tenant(&payment.tenant_id).await?;
        Ok(ledger::payment_view(payment, tenant.as_ref()))
    }

    pub async fn get(&self, id: &Uuid) -> AppResult<PaymentView> {
        let payment = self
            .store
            .get_payment(id)
            .await?
            .ok_or_else(|| AppError::payment_not_found(*id))?;
        self.view(payment).await
    }

    /// Record a payment for a tenant and month
    ///
    /// The store rejects a second payment for the same `(tenant, month)`,
    /// which surfaces as a conflict.
    pub async fn create(&self, input: NewPayment) -> AppResult<PaymentView> {
        let input = input.validate()?;
        let tenant = self
            .store
            .get_tenant(&input.tenant_id)
            .await?
            .ok_or_else(|| AppError::tenant_not_found(input.tenant_id))?;

        let payment = self.store.insert_payment(input.into_payment()).await?;
        tracing::info!(
            payment_id = %payment.id,
            tenant_id = %payment.tenant_id,
            month = %payment.month,
            paid_amount = payment.paid_amount,
            "payment recorded"
        );
        Ok(ledger::payment_view(payment, Some(&tenant)))
    }

    pub async fn update(&self, id: &Uuid, patch: PaymentPatch) -> AppResult<PaymentView> {
        let patch = patch.validate()?;
        let mut payment = self
            .store
            .get_payment(id)
            .await?
            .ok_or_else(|| AppError::payment_not_found(*id))?;

        if let Some(tenant_id) = patch.tenant_id {
            if self.store.get_tenant(&tenant_id).await?.is_none() {
                return Err(AppError::tenant_not_found(tenant_id));
            }
        }

        patch.apply(&mut payment);
        let payment = self
            .store
            .replace_payment(payment)
            .await?
            .ok_or_else(|| AppError::payment_not_found(*id))?;

        tracing::info!(payment_id = %id, month = %payment.month, "payment updated");
        self.view(payment).await
    }

    pub async fn delete(&self, id: &Uuid) -> AppResult<PaymentDeleted> {
        if !self.store.delete_payment(id).await? {
            return Err(AppError::payment_not_found(*id));
        }

        tracing::info!(payment_id = %id, "payment deleted");
        Ok(PaymentDeleted {
            message: PAYMENT_DELETED_MESSAGE.to_string(),
        })
    }
}
