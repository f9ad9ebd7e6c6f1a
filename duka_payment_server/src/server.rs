use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use duka_payment_engine::{events::EventProducers, PaymentFlowApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    hooks::create_pos_event_subscriptions,
    integrations::SwiftPesaGateway,
    routes::{health, GatewayWebhookGetRoute, GatewayWebhookPostRoute, InitiatePaymentRoute, PaymentStatusRoute},
    sync_worker::start_sync_worker,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = SwiftPesaGateway::new(config.swiftpesa_config.clone(), config.gateway_timeout)?;
    let subscriptions = create_pos_event_subscriptions();
    let producers = subscriptions.producers();
    subscriptions.start();
    start_sync_worker(db.clone(), gateway.clone(), producers.clone(), config.order_sync_interval);
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: SwiftPesaGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let flow_api = PaymentFlowApi::new(db.clone(), gateway.clone(), producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dps::access_log"))
            .app_data(web::Data::new(flow_api))
            .service(health)
            .service(GatewayWebhookGetRoute::<SqliteDatabase, SwiftPesaGateway>::new())
            .service(GatewayWebhookPostRoute::<SqliteDatabase, SwiftPesaGateway>::new())
            .service(PaymentStatusRoute::<SqliteDatabase, SwiftPesaGateway>::new())
            .service(InitiatePaymentRoute::<SqliteDatabase, SwiftPesaGateway>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
