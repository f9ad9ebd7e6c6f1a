use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::SwiftPesaConfig,
    data_objects::{CollectionReceipt, CollectionRequest, TransactionStatus},
    SwiftPesaApiError,
};

#[derive(Clone)]
pub struct SwiftPesaApi {
    config: SwiftPesaConfig,
    client: Arc<Client>,
}

impl SwiftPesaApi {
    pub fn new(config: SwiftPesaConfig) -> Result<Self, SwiftPesaApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| SwiftPesaApiError::Initialization(e.to_string()))?;
        headers.insert("X-SwiftPesa-Api-Key", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SwiftPesaApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Ask the gateway to start collecting the given amount from the subscriber. A successful response only means
    /// the request was *accepted*; settlement is reported later via webhook or discovered via [`Self::query_status`].
    pub async fn initiate_collection(&self, request: &CollectionRequest) -> Result<CollectionReceipt, SwiftPesaApiError> {
        debug!("📡️ Initiating collection of {} for reference {}", request.amount, request.reference);
        let path = format!("/v1/merchants/{}/collections", self.config.merchant_id);
        let receipt: CollectionReceipt = self.rest_query(Method::POST, &path, &[], Some(request)).await?;
        trace!("📡️ Collection accepted with tracking id {}", receipt.transid);
        Ok(receipt)
    }

    /// Fetch the authoritative status of a previously initiated collection.
    pub async fn query_status(&self, transid: &str) -> Result<TransactionStatus, SwiftPesaApiError> {
        trace!("📡️ Querying status for tracking id {transid}");
        let path = format!("/v1/merchants/{}/collections/status", self.config.merchant_id);
        self.rest_query(Method::GET, &path, &[("transid", transid)], None::<()>).await
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, SwiftPesaApiError> {
        let url = format!("{}{path}", self.config.api_url);
        trace!("📡️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| SwiftPesaApiError::TransportError(e.to_string()))?;
        if response.status().is_success() {
            trace!("📡️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| SwiftPesaApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| SwiftPesaApiError::TransportError(e.to_string()))?;
            if (400..500).contains(&status) {
                Err(SwiftPesaApiError::Rejected(message))
            } else {
                Err(SwiftPesaApiError::QueryError { status, message })
            }
        }
    }
}
