//! Input validation for tenant and payment requests

pub mod payloads;
pub mod validators;

pub use payloads::{
    NewPayment, NewTenant, PaymentPatch, TenantPatch, ValidNewPayment, ValidPaymentPatch,
};
