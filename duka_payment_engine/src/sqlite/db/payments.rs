use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPayment, Payment, PaymentId, PaymentStatus, ReferenceNumber, SettlementDetails},
    helpers::new_payment_id,
    traits::PaymentStoreError,
};

/// Insert a new `Pending` payment. If a payment with the same reference number already exists, the existing record
/// is returned instead; the boolean reports whether an insert happened.
pub async fn idempotent_insert(
    payment: NewPayment,
    conn: &mut SqliteConnection,
) -> Result<(Payment, bool), PaymentStoreError> {
    let id = new_payment_id();
    let reference = payment.reference_number.clone();
    let result = sqlx::query_as(
        r#"
            INSERT INTO payments (id, order_id, reference_number, amount, method, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(payment.order_id)
    .bind(payment.reference_number)
    .bind(payment.amount)
    .bind(payment.method)
    .bind(payment.phone_number)
    .fetch_one(&mut *conn)
    .await;
    match result {
        Ok(payment) => Ok((payment, true)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let existing = fetch_payment_by_reference(&reference, conn)
                .await?
                .ok_or_else(|| PaymentStoreError::PaymentNotFound(reference.to_string()))?;
            Ok((existing, false))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_payment(
    id: &PaymentId,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, PaymentStoreError> {
    let payment = sqlx::query_as(r#"SELECT * FROM payments WHERE id = ?"#).bind(id).fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn fetch_payment_by_reference(
    reference: &ReferenceNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, PaymentStoreError> {
    let payment = sqlx::query_as(r#"SELECT * FROM payments WHERE reference_number = ?"#)
        .bind(reference)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

/// Store the gateway-assigned tracking id. The tracking id is write-once: if one is already present, the stored
/// record is returned unchanged.
pub async fn attach_tracking_id(
    id: &PaymentId,
    tracking_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Payment, PaymentStoreError> {
    let updated: Option<Payment> = sqlx::query_as(
        r#"
            UPDATE payments SET gateway_tracking_id = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND gateway_tracking_id IS NULL
            RETURNING *;
        "#,
    )
    .bind(tracking_id)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    match updated {
        Some(payment) => Ok(payment),
        None => fetch_payment(id, conn).await?.ok_or_else(|| PaymentStoreError::PaymentNotFound(id.to_string())),
    }
}

/// The conditional write that resolves the webhook/poll race. The guard clause pins the previous status to
/// `Pending`, so exactly one writer can ever observe a row here; everyone else gets `None` and must re-read.
pub async fn settle(
    reference: &ReferenceNumber,
    status: PaymentStatus,
    details: &SettlementDetails,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, PaymentStoreError> {
    let payment = sqlx::query_as(
        r#"
            UPDATE payments
            SET status = $1,
                confirmation_code = $2,
                transaction_id = $3,
                metadata = $4,
                updated_at = CURRENT_TIMESTAMP
            WHERE reference_number = $5 AND status = 'Pending'
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(details.confirmation_code.as_deref())
    .bind(details.transaction_id.as_deref())
    .bind(details.metadata.as_deref())
    .bind(reference)
    .fetch_optional(conn)
    .await?;
    Ok(payment)
}

/// Completed payments whose order has not caught up yet.
pub async fn fetch_unsynced(conn: &mut SqliteConnection) -> Result<Vec<Payment>, PaymentStoreError> {
    let payments = sqlx::query_as(
        r#"
            SELECT p.* FROM payments p
            JOIN orders o ON o.id = p.order_id
            WHERE p.status = 'Completed' AND o.payment_status = 'Unpaid';
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(payments)
}
