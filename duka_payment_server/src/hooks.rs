//! Event callbacks wired into the payment engine.
//!
//! The engine publishes an `OrderPaidEvent` whenever reconciliation marks an order as paid, regardless of which
//! channel won the race. The server reacts by writing a receipt line to the journal log, which the till-facing
//! display tails to confirm the sale to the cashier.

use duka_payment_engine::events::EventSubscriptions;
use log::*;

pub const EVENT_BUFFER_SIZE: usize = 25;

pub fn create_pos_event_subscriptions() -> EventSubscriptions {
    let mut subscriptions = EventSubscriptions::new(EVENT_BUFFER_SIZE);
    subscriptions.on_order_paid(|ev| {
        Box::pin(async move {
            let confirmation = ev.payment.confirmation_code.as_deref().unwrap_or("-").to_string();
            info!(
                "🧾️ Order {} paid: {} via {} (confirmation {confirmation})",
                ev.order.id, ev.payment.amount, ev.payment.method
            );
        })
    });
    subscriptions
}
