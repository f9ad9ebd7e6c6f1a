//! Duka Payment Engine
//!
//! The engine owns the one genuinely hard part of the Duka POS: reconciling the authoritative state of a payment
//! held by the external SwiftPesa gateway with the locally stored `Payment` and `Order` records. Status updates
//! arrive over two independent, unordered, possibly-duplicated channels (a push webhook and a client-driven poll);
//! both funnel into a single reconciliation codepath so that an order transitions to "paid" exactly once and never
//! regresses.
//!
//! The library is divided into three main sections:
//! 1. Database management ([`mod@sqlite`]). You should never need to access the database directly; use the public
//!    API instead. The exception is the data types, defined in [`mod@db_types`].
//! 2. The public API ([`PaymentFlowApi`]), generic over a [`traits::PaymentStore`] backend and a
//!    [`traits::PaymentGateway`] client so that tests can substitute fakes for both.
//! 3. An event hook system ([`mod@events`]) that emits an `OrderPaidEvent` whenever reconciliation marks an order
//!    as paid.

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

mod dpe_api;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use dpe_api::{
    errors::PaymentFlowError,
    payment_flow_api::{PaymentFlowApi, ReconcileOutcome},
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
