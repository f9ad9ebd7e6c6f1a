//! A thin client for the SwiftPesa payment gateway REST API.
//!
//! The client wraps exactly two calls: initiating a collection request, and querying the status of a previously
//! initiated request. It performs no retries and no caching; callers own the retry policy. It holds no reference to
//! local storage, so it is safe to call from anywhere.

mod api;
mod config;
mod error;

mod data_objects;

pub use api::SwiftPesaApi;
pub use config::SwiftPesaConfig;
pub use data_objects::{CollectionRequest, CollectionReceipt, TransactionStatus, SWIFTPESA_SUCCESS_CODE};
pub use error::SwiftPesaApiError;
