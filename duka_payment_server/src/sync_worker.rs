use std::time::Duration;

use duka_payment_engine::{events::EventProducers, PaymentFlowApi, SqliteDatabase};
use log::*;
use tokio::task::JoinHandle;

use crate::integrations::SwiftPesaGateway;

/// Starts the order-sync worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every tick, the worker re-applies the order-side effect of completed payments whose order is still unpaid. This
/// is the recovery path for a crash or storage fault between "payment settled" and "order updated"; the payments
/// themselves are already terminal, so the gateway is never consulted here.
pub fn start_sync_worker(
    db: SqliteDatabase,
    gateway: SwiftPesaGateway,
    producers: EventProducers,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let api = PaymentFlowApi::new(db, gateway, producers);
        info!("🧹️ Order sync worker started, sweeping every {}s", interval.as_secs());
        loop {
            timer.tick().await;
            trace!("🧹️ Running order sync sweep");
            match api.sweep_unsynced_orders().await {
                Ok(healed) if healed.is_empty() => {
                    trace!("🧹️ All orders are in sync");
                },
                Ok(healed) => {
                    info!("🧹️ {} orders caught up with their completed payments: {}", healed.len(), id_list(&healed));
                },
                Err(e) => {
                    error!("🧹️ Error running order sync sweep: {e}");
                },
            }
        }
    })
}

fn id_list(orders: &[duka_payment_engine::db_types::Order]) -> String {
    orders.iter().map(|o| o.id.to_string()).collect::<Vec<String>>().join(", ")
}
