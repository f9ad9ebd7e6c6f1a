use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId},
    traits::PaymentStoreError,
};

/// Insert a new order. Idempotent: an existing order with the same id is returned unchanged, with the boolean
/// reporting whether an insert happened.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<(Order, bool), PaymentStoreError> {
    let id = order.id.clone();
    let result = sqlx::query_as(
        r#"
            INSERT INTO orders (id, customer_id, total) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.total)
    .fetch_one(&mut *conn)
    .await;
    match result {
        Ok(order) => Ok((order, true)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let existing =
                fetch_order(&id, conn).await?.ok_or_else(|| PaymentStoreError::OrderNotFound(id.clone()))?;
            Ok((existing, false))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_order(id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, PaymentStoreError> {
    let order = sqlx::query_as(r#"SELECT * FROM orders WHERE id = ?"#).bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// The order-side effect of a completed payment, as one atomic statement: `payment_status` becomes `Paid`, and the
/// workflow status advances to `Confirmed` only from the pre-confirmation stages. An order that has progressed
/// past `Submitted` keeps its workflow status.
pub async fn mark_paid(id: &OrderId, conn: &mut SqliteConnection) -> Result<Order, PaymentStoreError> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders
            SET payment_status = 'Paid',
                status = CASE WHEN status IN ('Draft', 'Submitted') THEN 'Confirmed' ELSE status END,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| PaymentStoreError::OrderNotFound(id.clone()))?;
    Ok(order)
}
