use duka_payment_engine::{
    db_types::{
        GatewayStatusReport,
        NewOrder,
        NewPayment,
        Order,
        OrderId,
        Payment,
        PaymentId,
        PaymentStatus,
        ReferenceNumber,
        SettlementDetails,
    },
    traits::{GatewayError, InitiateReceipt, PaymentGateway, PaymentStore, PaymentStoreError},
};
use mockall::mock;

mock! {
    pub PaymentStoreDb {}
    impl PaymentStore for PaymentStoreDb {
        fn url(&self) -> &str;
        async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), PaymentStoreError>;
        async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, PaymentStoreError>;
        async fn insert_payment(&self, payment: NewPayment) -> Result<(Payment, bool), PaymentStoreError>;
        async fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentStoreError>;
        async fn fetch_payment_by_reference(&self, reference: &ReferenceNumber) -> Result<Option<Payment>, PaymentStoreError>;
        async fn attach_tracking_id(&self, id: &PaymentId, tracking_id: &str) -> Result<Payment, PaymentStoreError>;
        async fn settle_payment(&self, reference: &ReferenceNumber, status: PaymentStatus, details: &SettlementDetails) -> Result<Option<Payment>, PaymentStoreError>;
        async fn mark_order_paid(&self, order_id: &OrderId) -> Result<Order, PaymentStoreError>;
        async fn fetch_unsynced_payments(&self) -> Result<Vec<Payment>, PaymentStoreError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn initiate(&self, payment: &Payment) -> Result<InitiateReceipt, GatewayError>;
        async fn query_status(&self, tracking_id: &str) -> Result<GatewayStatusReport, GatewayError>;
    }
}
