//! The seams of the engine.
//!
//! [`PaymentStore`] is implemented by storage backends (see [`crate::SqliteDatabase`]), and [`PaymentGateway`] by
//! clients of the external payment gateway. The [`crate::PaymentFlowApi`] is generic over both, so tests can
//! substitute fakes without any process-wide state.

mod payment_gateway;
mod payment_store;

pub use payment_gateway::{GatewayError, InitiateReceipt, PaymentGateway};
pub use payment_store::{PaymentStore, PaymentStoreError};
