use crate::db_types::PaymentId;

/// Generate a fresh opaque payment id.
pub fn new_payment_id() -> PaymentId {
    PaymentId(format!("pay-{:016x}", rand::random::<u64>()))
}
