use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use duka_payment_engine::PaymentFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The payment gateway rejected the request. {0}")]
    GatewayRejected(String),
    #[error("The payment gateway could not be reached. {0}")]
    GatewayUnavailable(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::GatewayRejected(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GatewayUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<PaymentFlowError> for ServerError {
    fn from(e: PaymentFlowError) -> Self {
        use duka_payment_engine::traits::GatewayError;
        match e {
            PaymentFlowError::PaymentNotFound(_) | PaymentFlowError::PaymentIdNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            PaymentFlowError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            PaymentFlowError::Gateway(GatewayError::Rejected(msg)) => Self::GatewayRejected(msg),
            PaymentFlowError::Gateway(inner) => Self::GatewayUnavailable(inner.to_string()),
            PaymentFlowError::Storage(inner) => Self::BackendError(inner.to_string()),
            // The payment is settled; only the order write failed. The sync sweep retries it, but the caller must
            // still see a server error for this request.
            PaymentFlowError::OrderSyncFailed { .. } => Self::BackendError(e.to_string()),
        }
    }
}
