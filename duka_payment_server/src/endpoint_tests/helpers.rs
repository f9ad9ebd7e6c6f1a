use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use duka_common::Money;
use duka_payment_engine::db_types::{Order, OrderPaymentStatus, OrderStatusType, Payment, PaymentStatus};

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let req = TestRequest::get().uri(path).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn post_request(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub fn pending_payment() -> Payment {
    Payment {
        id: "pay-0000000000000001".to_string().into(),
        order_id: "O-1001".to_string().into(),
        reference_number: "REF-001".into(),
        gateway_tracking_id: Some("SPT-998877".to_string()),
        amount: Money::from(1_500_000),
        method: "MobileMoney".to_string(),
        phone_number: "255700000001".to_string(),
        status: PaymentStatus::Pending,
        confirmation_code: None,
        transaction_id: None,
        metadata: None,
        created_at: Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap(),
    }
}

pub fn untracked_payment() -> Payment {
    Payment { gateway_tracking_id: None, ..pending_payment() }
}

pub fn completed_payment() -> Payment {
    Payment {
        status: PaymentStatus::Completed,
        confirmation_code: Some("CEB52HQ8XN".to_string()),
        transaction_id: Some("TX-44210".to_string()),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 10, 12, 5, 0).unwrap(),
        ..pending_payment()
    }
}

pub fn submitted_order() -> Order {
    Order {
        id: "O-1001".to_string().into(),
        customer_id: "cust-1".to_string(),
        total: Money::from(1_500_000),
        status: OrderStatusType::Submitted,
        payment_status: OrderPaymentStatus::Unpaid,
        created_at: Utc.with_ymd_and_hms(2024, 6, 10, 11, 55, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 10, 11, 55, 0).unwrap(),
    }
}

pub fn paid_order() -> Order {
    Order {
        status: OrderStatusType::Confirmed,
        payment_status: OrderPaymentStatus::Paid,
        updated_at: Utc.with_ymd_and_hms(2024, 6, 10, 12, 5, 0).unwrap(),
        ..submitted_order()
    }
}
