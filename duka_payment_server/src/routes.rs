//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are generic over the storage and gateway traits so that the endpoint tests can run them against mocks.
//! Since actix-web cannot register generic handlers directly, registration goes through the `route!` macro below.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use duka_payment_engine::{
    db_types::{PaymentId, ReferenceNumber},
    traits::{PaymentGateway, PaymentStore},
    PaymentFlowApi,
    PaymentFlowError,
};

use crate::{
    data_objects::{JsonResponse, PaymentInitRequest, PaymentInitResponse, PaymentStatusResponse, WebhookParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// --------------------------------------------   Webhook   ----------------------------------------------------
// SwiftPesa delivers status notifications on both GET and POST, carrying the parameters in the query string either
// way. Both registrations funnel into the same handler.

route!(gateway_webhook_get => Get "/gateway/webhook" impl PaymentStore, PaymentGateway);
route!(gateway_webhook_post => Post "/gateway/webhook" impl PaymentStore, PaymentGateway);

pub async fn gateway_webhook_get<B: PaymentStore, G: PaymentGateway>(
    params: web::Query<WebhookParams>,
    api: web::Data<PaymentFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    handle_gateway_webhook(params.into_inner(), api.as_ref()).await
}

pub async fn gateway_webhook_post<B: PaymentStore, G: PaymentGateway>(
    params: web::Query<WebhookParams>,
    api: web::Data<PaymentFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    handle_gateway_webhook(params.into_inner(), api.as_ref()).await
}

/// The push channel. The notification is only a trigger; the flow API queries the gateway for the authoritative
/// status before reconciling. Replies:
/// * 200 with `success: true` once reconciliation ran, whether or not anything changed. Duplicate deliveries land
///   here as no-ops.
/// * 400 when either correlation parameter is missing.
/// * 404 when the reference matches no payment. This points at a correlation bug and is logged loudly.
/// * 500 on storage faults or an unreachable gateway, so SwiftPesa redelivers later.
async fn handle_gateway_webhook<B: PaymentStore, G: PaymentGateway>(
    params: WebhookParams,
    api: &PaymentFlowApi<B, G>,
) -> Result<HttpResponse, ServerError> {
    let transid = params.transid.ok_or_else(|| ServerError::MissingParameter("transid".to_string()))?;
    let reference = params.reference.ok_or_else(|| ServerError::MissingParameter("reference".to_string()))?;
    debug!("🔔️ Gateway webhook received for reference {reference} (transid {transid})");
    let reference = ReferenceNumber::from(reference);
    match api.process_gateway_notification(&transid, &reference).await {
        Ok(outcome) if outcome.applied => {
            info!("🔔️ Webhook settled payment {} as {}", outcome.payment.id, outcome.payment.status);
            Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Payment is {}", outcome.payment.status))))
        },
        Ok(outcome) => {
            debug!("🔔️ Webhook for {reference} was a no-op; payment is {}", outcome.payment.status);
            Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Payment is {}", outcome.payment.status))))
        },
        Err(PaymentFlowError::PaymentNotFound(reference)) => {
            error!("🔔️ Webhook referenced unknown payment {reference}. This indicates a correlation bug.");
            Err(ServerError::NoRecordFound(format!("No payment for reference {reference}")))
        },
        Err(e) => {
            warn!("🔔️ Webhook for {reference} could not be processed. {e}");
            Err(e.into())
        },
    }
}

// ------------------------------------------   Status poll  ---------------------------------------------------

route!(payment_status => Get "/payments/{id}/status" impl PaymentStore, PaymentGateway);

/// The pull channel. Returns the best-known state of the payment, consulting the gateway only when the stored
/// status is still pending. A gateway outage degrades to the last stored state rather than an error.
pub async fn payment_status<B: PaymentStore, G: PaymentGateway>(
    path: web::Path<String>,
    api: web::Data<PaymentFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let id = PaymentId::from(path.into_inner());
    trace!("🔎️ Status poll for payment {id}");
    let payment = api.poll_status(&id).await?;
    Ok(HttpResponse::Ok().json(PaymentStatusResponse::from(&payment)))
}

// -------------------------------------------   Initiation  ---------------------------------------------------

route!(initiate_payment => Post "/payments" impl PaymentStore, PaymentGateway);

/// Record a new pending payment and ask the gateway to start collecting it. Idempotent on the reference number.
pub async fn initiate_payment<B: PaymentStore, G: PaymentGateway>(
    body: web::Json<PaymentInitRequest>,
    api: web::Data<PaymentFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    if request.phone_number.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("phone_number must not be empty".to_string()));
    }
    if request.reference_number.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("reference_number must not be empty".to_string()));
    }
    debug!("💳️ Initiation request for order {} (reference {})", request.order_id, request.reference_number);
    let payment = api.initiate_payment(request.into()).await?;
    info!("💳️ Payment {} initiated for order {}", payment.id, payment.order_id);
    Ok(HttpResponse::Ok().json(PaymentInitResponse::from(&payment)))
}
