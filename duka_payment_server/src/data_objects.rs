use chrono::{DateTime, Utc};
use duka_common::Money;
use duka_payment_engine::db_types::{NewPayment, Payment, PaymentStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Query/form parameters of a gateway webhook call. SwiftPesa delivers these on both GET and POST, and has been
/// observed to omit fields, so everything is optional here and validated in the handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookParams {
    pub transid: Option<String>,
    pub reference: Option<String>,
}

/// Request body for initiating a payment against an existing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitRequest {
    pub order_id: String,
    /// Client-generated correlation key. Retrying with the same reference is safe and returns the original payment.
    pub reference_number: String,
    /// Amount in minor currency units.
    pub amount: Money,
    #[serde(default)]
    pub method: Option<String>,
    pub phone_number: String,
}

impl From<PaymentInitRequest> for NewPayment {
    fn from(req: PaymentInitRequest) -> Self {
        let mut payment = NewPayment::new(req.order_id.into(), req.reference_number.into(), req.amount)
            .with_phone_number(req.phone_number);
        if let Some(method) = req.method {
            payment.method = method;
        }
        payment
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitResponse {
    pub success: bool,
    pub payment_id: String,
    pub reference_number: String,
    pub tracking_id: Option<String>,
}

impl From<&Payment> for PaymentInitResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            success: true,
            payment_id: payment.id.to_string(),
            reference_number: payment.reference_number.to_string(),
            tracking_id: payment.gateway_tracking_id.clone(),
        }
    }
}

/// The client-facing view of a payment's current state. `payment_date` is only present once the payment has
/// reached a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub payment_id: String,
    pub order_id: String,
    pub status: PaymentStatus,
    pub method: String,
    pub amount: Money,
    pub confirmation_code: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl From<&Payment> for PaymentStatusResponse {
    fn from(payment: &Payment) -> Self {
        let payment_date = payment.status.is_terminal().then_some(payment.updated_at);
        Self {
            payment_id: payment.id.to_string(),
            order_id: payment.order_id.as_str().to_string(),
            status: payment.status,
            method: payment.method.clone(),
            amount: payment.amount,
            confirmation_code: payment.confirmation_code.clone(),
            payment_date,
        }
    }
}
