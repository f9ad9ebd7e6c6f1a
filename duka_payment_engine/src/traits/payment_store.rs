use thiserror::Error;

use crate::db_types::{
    NewOrder,
    NewPayment,
    Order,
    OrderId,
    Payment,
    PaymentId,
    PaymentStatus,
    ReferenceNumber,
    SettlementDetails,
};

/// Durable keyed storage for `Payment` and `Order` records.
///
/// All mutation of payment/order state flows through this trait; request handlers never touch the store directly.
/// The contract that makes the webhook/poll race safe is [`Self::settle_payment`]: it must be an atomic
/// compare-and-set conditioned on the stored status still being `Pending` at write time.
#[allow(async_fn_in_trait)]
pub trait PaymentStore {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Store a new order. This call is idempotent: returns the order and `true` if it was inserted, or the existing
    /// record and `false` if an order with the same id already existed.
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), PaymentStoreError>;

    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, PaymentStoreError>;

    /// Store a new `Pending` payment. Idempotent on `reference_number`: re-submitting the same reference returns
    /// the existing record and `false`, so client retries of the initiation call are safe.
    async fn insert_payment(&self, payment: NewPayment) -> Result<(Payment, bool), PaymentStoreError>;

    async fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentStoreError>;

    /// Locate a payment by its correlation key. This is the only lookup the webhook channel may use, since the
    /// gateway does not echo our internal id.
    async fn fetch_payment_by_reference(
        &self,
        reference: &ReferenceNumber,
    ) -> Result<Option<Payment>, PaymentStoreError>;

    /// Record the tracking id the gateway assigned at initiation. The tracking id is immutable once set; a second
    /// call returns the stored record unchanged.
    async fn attach_tracking_id(&self, id: &PaymentId, tracking_id: &str) -> Result<Payment, PaymentStoreError>;

    /// Atomically transition the payment identified by `reference` from `Pending` into the given terminal status,
    /// stamping the settlement details and `updated_at`.
    ///
    /// The update must be conditioned on `status = 'Pending'` at write time. Returns `None` when the condition did
    /// not hold, i.e. another writer won the race (or no such payment exists); the caller re-reads to distinguish
    /// the two.
    async fn settle_payment(
        &self,
        reference: &ReferenceNumber,
        status: PaymentStatus,
        details: &SettlementDetails,
    ) -> Result<Option<Payment>, PaymentStoreError>;

    /// Apply the order-side effect of a completed payment: `payment_status` becomes `Paid`, and the workflow status
    /// advances to `Confirmed` only if the order is at or before the pre-confirmation stage. Never regresses.
    async fn mark_order_paid(&self, order_id: &OrderId) -> Result<Order, PaymentStoreError>;

    /// Completed payments whose order is still `Unpaid`. These are the casualties of an order-sync failure and are
    /// healed by the background sweep without consulting the gateway again.
    async fn fetch_unsynced_payments(&self) -> Result<Vec<Payment>, PaymentStoreError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentStoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentStoreError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The requested payment does not exist: {0}")]
    PaymentNotFound(String),
}

impl From<sqlx::Error> for PaymentStoreError {
    fn from(e: sqlx::Error) -> Self {
        PaymentStoreError::DatabaseError(e.to_string())
    }
}
