use thiserror::Error;

use crate::db_types::{GatewayStatusReport, Payment};

/// The gateway's acknowledgement of an accepted initiation request.
#[derive(Debug, Clone)]
pub struct InitiateReceipt {
    pub tracking_id: String,
}

/// A client for the external payment gateway.
///
/// Implementations are side-effect free with respect to local storage, and perform no internal retries; the flow
/// API owns the retry policy. Every call must be bounded by a timeout, reported as [`GatewayError::Timeout`] --
/// a timeout means "status unknown" and is never classified as a terminal outcome.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Ask the gateway to start collecting the payment. On success the gateway assigns a tracking id for the
    /// attempt.
    async fn initiate(&self, payment: &Payment) -> Result<InitiateReceipt, GatewayError>;

    /// Fetch the authoritative status of a previously initiated payment.
    async fn query_status(&self, tracking_id: &str) -> Result<GatewayStatusReport, GatewayError>;
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Network failure talking to the gateway. Transient; never a terminal payment status.
    #[error("The gateway could not be reached. {0}")]
    Transport(String),
    /// The call exceeded its deadline. The gateway may still complete the payment, so this is "status unknown",
    /// not a failure.
    #[error("The gateway call timed out")]
    Timeout,
    /// The gateway affirmatively refused the request.
    #[error("The gateway rejected the request. {0}")]
    Rejected(String),
}
