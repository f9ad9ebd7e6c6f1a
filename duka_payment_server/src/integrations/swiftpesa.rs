//! The live [`PaymentGateway`] implementation backed by the SwiftPesa REST API.
//!
//! This adapter owns the timeout policy: every outbound call is bounded by the configured deadline and reported as
//! [`GatewayError::Timeout`] when exceeded. A timeout means "status unknown"; the flow API never treats it as a
//! terminal outcome.

use std::{future::Future, time::Duration};

use duka_common::DEFAULT_CURRENCY_CODE;
use duka_payment_engine::{
    db_types::{GatewayStatusReport, Payment},
    traits::{GatewayError, InitiateReceipt, PaymentGateway},
};
use log::*;
use swiftpesa_tools::{CollectionRequest, SwiftPesaApi, SwiftPesaApiError, SwiftPesaConfig, TransactionStatus};

use crate::errors::ServerError;

#[derive(Clone)]
pub struct SwiftPesaGateway {
    api: SwiftPesaApi,
    timeout: Duration,
}

impl SwiftPesaGateway {
    pub fn new(config: SwiftPesaConfig, timeout: Duration) -> Result<Self, ServerError> {
        let api = SwiftPesaApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api, timeout })
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, GatewayError>
    where F: Future<Output = Result<T, SwiftPesaApiError>> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(convert_error),
            Err(_) => {
                warn!("📡️ SwiftPesa call exceeded the {}s deadline", self.timeout.as_secs());
                Err(GatewayError::Timeout)
            },
        }
    }
}

impl PaymentGateway for SwiftPesaGateway {
    async fn initiate(&self, payment: &Payment) -> Result<InitiateReceipt, GatewayError> {
        let request = CollectionRequest {
            reference: payment.reference_number.to_string(),
            amount: payment.amount,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            msisdn: payment.phone_number.clone(),
            narration: Some(format!("Duka order {}", payment.order_id)),
        };
        let receipt = self.bounded(self.api.initiate_collection(&request)).await?;
        Ok(InitiateReceipt { tracking_id: receipt.transid })
    }

    async fn query_status(&self, tracking_id: &str) -> Result<GatewayStatusReport, GatewayError> {
        let status = self.bounded(self.api.query_status(tracking_id)).await?;
        Ok(to_status_report(status))
    }
}

fn convert_error(e: SwiftPesaApiError) -> GatewayError {
    match e {
        SwiftPesaApiError::Rejected(msg) => GatewayError::Rejected(msg),
        other => GatewayError::Transport(other.to_string()),
    }
}

fn to_status_report(status: TransactionStatus) -> GatewayStatusReport {
    GatewayStatusReport {
        status_code: status.result_code,
        status_description: status.result_description,
        confirmation_code: status.confirmation_code,
        transaction_id: status.transaction_id,
        channel: status.channel,
        account: status.msisdn,
    }
}
