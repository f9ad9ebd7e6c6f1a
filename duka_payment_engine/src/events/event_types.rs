use crate::db_types::{Order, Payment};

/// Published after reconciliation commits a `Completed` payment and the linked order has been marked as paid.
#[derive(Debug, Clone)]
pub struct OrderPaidEvent {
    pub order: Order,
    pub payment: Payment,
}

impl OrderPaidEvent {
    pub fn new(order: Order, payment: Payment) -> Self {
        Self { order, payment }
    }
}
