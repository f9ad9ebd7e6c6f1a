//! `SqliteDatabase` is a concrete implementation of a Duka payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`PaymentStore`] trait. The conditional-write
//! semantics required by [`PaymentStore::settle_payment`] are provided by a single guarded `UPDATE`, so no
//! extra locking is needed.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders, payments};
use crate::{
    db_types::{
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
    traits::{PaymentStore, PaymentStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, PaymentStoreError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl PaymentStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::idempotent_insert(order, &mut conn).await
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(id, &mut conn).await
    }

    async fn insert_payment(&self, payment: NewPayment) -> Result<(Payment, bool), PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::idempotent_insert(payment, &mut conn).await
    }

    async fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payment(id, &mut conn).await
    }

    async fn fetch_payment_by_reference(
        &self,
        reference: &ReferenceNumber,
    ) -> Result<Option<Payment>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payment_by_reference(reference, &mut conn).await
    }

    async fn attach_tracking_id(&self, id: &PaymentId, tracking_id: &str) -> Result<Payment, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::attach_tracking_id(id, tracking_id, &mut conn).await
    }

    async fn settle_payment(
        &self,
        reference: &ReferenceNumber,
        status: PaymentStatus,
        details: &SettlementDetails,
    ) -> Result<Option<Payment>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::settle(reference, status, details, &mut conn).await
    }

    async fn mark_order_paid(&self, order_id: &OrderId) -> Result<Order, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::mark_paid(order_id, &mut conn).await
    }

    async fn fetch_unsynced_payments(&self) -> Result<Vec<Payment>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_unsynced(&mut conn).await
    }

    async fn close(&mut self) -> Result<(), PaymentStoreError> {
        self.pool.close().await;
        Ok(())
    }
}
