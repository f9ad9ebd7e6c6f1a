use thiserror::Error;

use crate::{
    db_types::{OrderId, PaymentId, ReferenceNumber},
    traits::{GatewayError, PaymentStoreError},
};

#[derive(Debug, Error)]
pub enum PaymentFlowError {
    /// The gateway referenced a payment we have no record of. This indicates a correlation or data-integrity bug,
    /// not a normal race; it is logged for investigation and never auto-retried.
    #[error("No payment found for reference number {0}")]
    PaymentNotFound(ReferenceNumber),
    #[error("No payment found with id {0}")]
    PaymentIdNotFound(PaymentId),
    #[error("The order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Storage error. {0}")]
    Storage(#[from] PaymentStoreError),
    #[error("Gateway error. {0}")]
    Gateway(#[from] GatewayError),
    /// The payment reached its terminal state, but the order-side effect failed. The payment must NOT be
    /// re-derived from the gateway; the order update is retried independently by the sync sweep.
    #[error("Payment {payment_id} settled, but order {order_id} could not be updated. {source}")]
    OrderSyncFailed { payment_id: PaymentId, order_id: OrderId, source: PaymentStoreError },
}
