use duka_common::Money;
use serde::{Deserialize, Serialize};

/// The result code SwiftPesa reports for a successfully settled transaction.
pub const SWIFTPESA_SUCCESS_CODE: &str = "1";

/// Wire format for a collection (USSD push) request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRequest {
    /// Merchant-assigned correlation key. SwiftPesa echoes this back in status notifications.
    pub reference: String,
    /// Amount in minor currency units.
    pub amount: Money,
    pub currency: String,
    /// The subscriber number to push the payment prompt to.
    pub msisdn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
}

/// SwiftPesa's acknowledgement of an accepted collection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReceipt {
    /// The gateway-assigned tracking identifier for this payment attempt.
    pub transid: String,
    pub result_code: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Wire format of a status query response.
///
/// `result_code` and `result_description` together determine the outcome; the remaining fields are only populated
/// once the transaction has settled on the gateway side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub transid: String,
    pub result_code: String,
    pub result_description: String,
    #[serde(default)]
    pub confirmation_code: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// The network/channel the subscriber paid over, e.g. "VODACOM-TZ".
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub msisdn: Option<String>,
}
