use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use duka_common::Money;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The result code SwiftPesa uses to report a successfully settled transaction.
pub const GATEWAY_SUCCESS_CODE: &str = "1";

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct ConversionError(String);

//--------------------------------------      PaymentId       --------------------------------------------------------
/// Opaque primary identifier for a payment, assigned at creation and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct PaymentId(pub String);

impl PaymentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PaymentId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for PaymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------       OrderId        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------   ReferenceNumber    --------------------------------------------------------
/// The caller-generated correlation and idempotency key for a payment. This is the *only* key the webhook channel
/// can use to locate a payment, since the gateway never echoes our internal id back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct ReferenceNumber(pub String);

impl ReferenceNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ReferenceNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ReferenceNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ReferenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------    PaymentStatus     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// The payment has been initiated, and the gateway has not reported a terminal outcome yet.
    Pending,
    /// The gateway confirmed that the customer paid.
    Completed,
    /// The gateway affirmatively reported the payment as failed or cancelled.
    Failed,
}

impl PaymentStatus {
    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Completed => write!(f, "Completed"),
            PaymentStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PaymentStatus::Pending
        })
    }
}

//------------------------------------   OrderPaymentStatus   --------------------------------------------------------
/// Derived exclusively from the linked payment's terminal state; never set directly by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderPaymentStatus {
    Unpaid,
    Paid,
}

impl Display for OrderPaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderPaymentStatus::Unpaid => write!(f, "Unpaid"),
            OrderPaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for OrderPaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            s => Err(ConversionError(format!("Invalid order payment status: {s}"))),
        }
    }
}

//--------------------------------------   OrderStatusType    --------------------------------------------------------
/// The business workflow state of an order. Reconciliation only ever advances `Draft`/`Submitted` orders to
/// `Confirmed` as a side effect of the payment completing; it never regresses an order that has progressed further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    Draft,
    Submitted,
    Confirmed,
    Processing,
    Fulfilled,
    Cancelled,
}

impl OrderStatusType {
    /// True for stages the payment flow is allowed to push forward to `Confirmed`.
    pub fn is_pre_confirmation(&self) -> bool {
        matches!(self, OrderStatusType::Draft | OrderStatusType::Submitted)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Draft => write!(f, "Draft"),
            OrderStatusType::Submitted => write!(f, "Submitted"),
            OrderStatusType::Confirmed => write!(f, "Confirmed"),
            OrderStatusType::Processing => write!(f, "Processing"),
            OrderStatusType::Fulfilled => write!(f, "Fulfilled"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(Self::Draft),
            "Submitted" => Ok(Self::Submitted),
            "Confirmed" => Ok(Self::Confirmed),
            "Processing" => Ok(Self::Processing),
            "Fulfilled" => Ok(Self::Fulfilled),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------       Payment        --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub reference_number: ReferenceNumber,
    /// Assigned by the gateway once initiation succeeds; immutable thereafter.
    pub gateway_tracking_id: Option<String>,
    pub amount: Money,
    pub method: String,
    pub phone_number: String,
    pub status: PaymentStatus,
    /// Set only on the transition into a terminal status.
    pub confirmation_code: Option<String>,
    pub transaction_id: Option<String>,
    /// The JSON-serialized gateway report that drove the terminal transition.
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewPayment      --------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub order_id: OrderId,
    /// Caller-generated. Re-submitting the same reference number is a safe retry, not a new payment.
    pub reference_number: ReferenceNumber,
    pub amount: Money,
    pub method: String,
    pub phone_number: String,
}

impl NewPayment {
    pub fn new(order_id: OrderId, reference_number: ReferenceNumber, amount: Money) -> Self {
        Self { order_id, reference_number, amount, method: "MobileMoney".to_string(), phone_number: String::new() }
    }

    pub fn with_phone_number<S: Into<String>>(mut self, phone_number: S) -> Self {
        self.phone_number = phone_number.into();
        self
    }
}

//--------------------------------------        Order         --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub total: Money,
    pub status: OrderStatusType,
    pub payment_status: OrderPaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder       --------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub customer_id: String,
    pub total: Money,
}

impl NewOrder {
    pub fn new(id: OrderId, customer_id: String, total: Money) -> Self {
        Self { id, customer_id, total }
    }
}

//----------------------------------   GatewayStatusReport    --------------------------------------------------------
/// The engine's view of a gateway status query. Both notification channels convert whatever the gateway sent into
/// this shape before reconciling, so the classification rule below is written exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayStatusReport {
    pub status_code: String,
    pub status_description: String,
    pub confirmation_code: Option<String>,
    pub transaction_id: Option<String>,
    pub channel: Option<String>,
    pub account: Option<String>,
}

impl GatewayStatusReport {
    /// The shared classification rule. A report is `Completed` iff the status code equals the gateway's success
    /// code or the description reads "completed"; `Failed` iff the gateway affirmatively reports a
    /// failure/cancellation; anything else (including timeouts, which never reach this point) is `Pending`.
    pub fn classify(&self) -> PaymentStatus {
        let desc = self.status_description.trim();
        if self.status_code == GATEWAY_SUCCESS_CODE || desc.eq_ignore_ascii_case("completed") {
            return PaymentStatus::Completed;
        }
        if desc.eq_ignore_ascii_case("failed")
            || desc.eq_ignore_ascii_case("cancelled")
            || desc.eq_ignore_ascii_case("canceled")
        {
            return PaymentStatus::Failed;
        }
        PaymentStatus::Pending
    }
}

//----------------------------------   SettlementDetails      --------------------------------------------------------
/// The fields stamped onto a payment when it transitions into a terminal status.
#[derive(Debug, Clone, Default)]
pub struct SettlementDetails {
    pub confirmation_code: Option<String>,
    pub transaction_id: Option<String>,
    pub metadata: Option<String>,
}

impl From<&GatewayStatusReport> for SettlementDetails {
    fn from(report: &GatewayStatusReport) -> Self {
        let metadata = serde_json::to_string(report).ok();
        Self {
            confirmation_code: report.confirmation_code.clone(),
            transaction_id: report.transaction_id.clone(),
            metadata,
        }
    }
}
