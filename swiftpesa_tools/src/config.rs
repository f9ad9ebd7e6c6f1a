use log::*;
use duka_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct SwiftPesaConfig {
    /// Base URL of the SwiftPesa REST API, e.g. "https://api.swiftpesa.example".
    pub api_url: String,
    pub api_key: Secret<String>,
    /// Merchant identifier assigned by SwiftPesa.
    pub merchant_id: String,
}

impl SwiftPesaConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("SWIFTPESA_API_URL").unwrap_or_else(|_| {
            warn!("SWIFTPESA_API_URL not set, using the sandbox endpoint");
            "https://sandbox.swiftpesa.example".to_string()
        });
        let api_key = Secret::new(std::env::var("SWIFTPESA_API_KEY").unwrap_or_else(|_| {
            warn!("SWIFTPESA_API_KEY not set, using (probably useless) default");
            "sp_test_00000000".to_string()
        }));
        let merchant_id = std::env::var("SWIFTPESA_MERCHANT_ID").unwrap_or_else(|_| {
            warn!("SWIFTPESA_MERCHANT_ID not set, using (probably useless) default");
            "M000000".to_string()
        });
        Self { api_url, api_key, merchant_id }
    }
}
