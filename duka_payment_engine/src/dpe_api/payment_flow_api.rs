use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{
        GatewayStatusReport,
        NewPayment,
        Order,
        Payment,
        PaymentId,
        PaymentStatus,
        ReferenceNumber,
        SettlementDetails,
    },
    dpe_api::errors::PaymentFlowError,
    events::{EventProducers, OrderPaidEvent},
    traits::{PaymentGateway, PaymentStore},
};

/// The result of a reconciliation attempt. `applied` is `true` only for the call that won the terminal transition;
/// duplicate deliveries, pending reports and lost races all return `false` together with the stored record.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub applied: bool,
    pub payment: Payment,
}

/// `PaymentFlowApi` is the single authority for mutating payment and order state in response to gateway events.
///
/// Both notification channels (the webhook push and the client-driven poll) funnel into [`Self::reconcile`], so the
/// conflict-resolution logic exists exactly once. The race between the channels is settled by the store's
/// conditional-write primitive, not by any coordination between handlers.
pub struct PaymentFlowApi<B, G> {
    db: B,
    gateway: G,
    producers: EventProducers,
}

impl<B, G> Debug for PaymentFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B, G> PaymentFlowApi<B, G> {
    pub fn new(db: B, gateway: G, producers: EventProducers) -> Self {
        Self { db, gateway, producers }
    }
}

impl<B, G> PaymentFlowApi<B, G>
where
    B: PaymentStore,
    G: PaymentGateway,
{
    /// Record a new `Pending` payment and ask the gateway to start collecting it.
    ///
    /// The insert is idempotent on the reference number, so a client retrying a dropped initiation call gets the
    /// existing payment back rather than a duplicate. The gateway is only contacted when no tracking id has been
    /// stored yet. Order state is never touched here.
    pub async fn initiate_payment(&self, new_payment: NewPayment) -> Result<Payment, PaymentFlowError> {
        let order_id = new_payment.order_id.clone();
        self.db
            .fetch_order(&order_id)
            .await?
            .ok_or_else(|| PaymentFlowError::OrderNotFound(order_id.clone()))?;
        let (payment, inserted) = self.db.insert_payment(new_payment).await?;
        if !inserted {
            debug!("💳️ Payment for reference {} already exists; treating as a retry", payment.reference_number);
        }
        if payment.gateway_tracking_id.is_some() {
            return Ok(payment);
        }
        let receipt = self.gateway.initiate(&payment).await?;
        debug!("💳️ Gateway accepted payment {} with tracking id {}", payment.id, receipt.tracking_id);
        let payment = self.db.attach_tracking_id(&payment.id, &receipt.tracking_id).await?;
        Ok(payment)
    }

    /// The webhook channel. The notification payload is only a trigger: the authoritative status always comes from
    /// a fresh gateway query, since push bodies may be malformed or stale.
    pub async fn process_gateway_notification(
        &self,
        tracking_id: &str,
        reference: &ReferenceNumber,
    ) -> Result<ReconcileOutcome, PaymentFlowError> {
        trace!("🔔️ Notification for reference {reference} (tracking id {tracking_id})");
        let report = self.gateway.query_status(tracking_id).await?;
        let status = report.classify();
        self.reconcile(reference, status, &report).await
    }

    /// The poll channel. Returns the best-known state of the payment:
    /// * unknown id -> error
    /// * already terminal, or never initiated -> the stored record, without contacting the gateway
    /// * otherwise the gateway is queried and the result reconciled exactly as the webhook path does; if the
    ///   gateway cannot be reached the stored state is returned rather than failing the whole call.
    ///
    /// Faults that strike *after* the payment was read also degrade rather than fail: a settled payment whose
    /// order write failed is reported in its terminal state (the order catches up via the sync sweep), and a
    /// storage fault during reconciliation falls back to the record already in hand.
    pub async fn poll_status(&self, id: &PaymentId) -> Result<Payment, PaymentFlowError> {
        let payment =
            self.db.fetch_payment(id).await?.ok_or_else(|| PaymentFlowError::PaymentIdNotFound(id.clone()))?;
        if payment.status.is_terminal() {
            return Ok(payment);
        }
        let Some(tracking_id) = payment.gateway_tracking_id.clone() else {
            return Ok(payment);
        };
        let report = match self.gateway.query_status(&tracking_id).await {
            Ok(report) => report,
            Err(e) => {
                warn!("🔎️ Could not query gateway for payment {id}. Returning last known state. {e}");
                return Ok(payment);
            },
        };
        let status = report.classify();
        match self.reconcile(&payment.reference_number, status, &report).await {
            Ok(outcome) => Ok(outcome.payment),
            Err(PaymentFlowError::OrderSyncFailed { .. }) => {
                warn!("🔎️ Payment {id} settled but its order is lagging; the sync sweep will catch it up.");
                let settled = self.db.fetch_payment(id).await.ok().flatten().unwrap_or(payment);
                Ok(settled)
            },
            Err(PaymentFlowError::Storage(e)) => {
                warn!("🔎️ Storage fault while reconciling payment {id}. Returning last known state. {e}");
                Ok(payment)
            },
            Err(e) => Err(e),
        }
    }

    /// The reconciliation core. Decides whether and how to mutate the payment/order pair for a gateway-reported
    /// status, enforcing idempotency and monotonicity:
    ///
    /// 1. Unknown reference -> [`PaymentFlowError::PaymentNotFound`].
    /// 2. Stored status already terminal -> no-op (`applied: false`). This is the expected outcome for duplicate
    ///    webhook deliveries and for a poll racing a webhook that already won.
    /// 3. Classified `Pending` -> no mutation.
    /// 4. Otherwise, a compare-and-set transition conditioned on the stored status still being `Pending`. A lost
    ///    race re-reads and reports the winner's record with `applied: false`.
    /// 5. A won `Completed` transition marks the order paid and notifies the order-paid hooks.
    pub async fn reconcile(
        &self,
        reference: &ReferenceNumber,
        status: PaymentStatus,
        report: &GatewayStatusReport,
    ) -> Result<ReconcileOutcome, PaymentFlowError> {
        let payment = self
            .db
            .fetch_payment_by_reference(reference)
            .await?
            .ok_or_else(|| PaymentFlowError::PaymentNotFound(reference.clone()))?;
        if payment.status.is_terminal() {
            trace!("🔄️ Payment {} is already {}; nothing to apply", payment.id, payment.status);
            return Ok(ReconcileOutcome { applied: false, payment });
        }
        if !status.is_terminal() {
            trace!("🔄️ Gateway still reports {reference} as pending; nothing to apply");
            return Ok(ReconcileOutcome { applied: false, payment });
        }
        let details = SettlementDetails::from(report);
        let settled = self.db.settle_payment(reference, status, &details).await?;
        let payment = match settled {
            Some(p) => p,
            None => {
                // Another writer won between our read and the conditional write. Re-read and report their result.
                let payment = self
                    .db
                    .fetch_payment_by_reference(reference)
                    .await?
                    .ok_or_else(|| PaymentFlowError::PaymentNotFound(reference.clone()))?;
                debug!("🔄️ Lost the settlement race for {reference}; stored status is {}", payment.status);
                return Ok(ReconcileOutcome { applied: false, payment });
            },
        };
        info!("🔄️ Payment {} transitioned to {status} for order {}", payment.id, payment.order_id);
        if status == PaymentStatus::Completed {
            let order = self.sync_order(&payment).await?;
            self.call_order_paid_hook(&order, &payment).await;
        }
        Ok(ReconcileOutcome { applied: true, payment })
    }

    /// Re-apply the order-side effect for every completed payment whose order is still unpaid. This is the retry
    /// path for [`PaymentFlowError::OrderSyncFailed`]; the payments themselves are already terminal and are never
    /// re-derived from the gateway.
    pub async fn sweep_unsynced_orders(&self) -> Result<Vec<Order>, PaymentFlowError> {
        let stranded = self.db.fetch_unsynced_payments().await?;
        let mut healed = Vec::with_capacity(stranded.len());
        for payment in stranded {
            match self.db.mark_order_paid(&payment.order_id).await {
                Ok(order) => {
                    info!("🧹️ Order {} caught up with completed payment {}", order.id, payment.id);
                    self.call_order_paid_hook(&order, &payment).await;
                    healed.push(order);
                },
                Err(e) => {
                    warn!("🧹️ Order {} still cannot be updated: {e}", payment.order_id);
                },
            }
        }
        Ok(healed)
    }

    async fn sync_order(&self, payment: &Payment) -> Result<Order, PaymentFlowError> {
        self.db.mark_order_paid(&payment.order_id).await.map_err(|source| {
            error!(
                "🔄️ Payment {} is Completed, but order {} could not be marked as paid. {source}",
                payment.id, payment.order_id
            );
            PaymentFlowError::OrderSyncFailed {
                payment_id: payment.id.clone(),
                order_id: payment.order_id.clone(),
                source,
            }
        })
    }

    async fn call_order_paid_hook(&self, order: &Order, payment: &Payment) {
        for emitter in &self.producers.order_paid {
            debug!("🔄️ Notifying order paid hook subscribers for order {}", order.id);
            let event = OrderPaidEvent::new(order.clone(), payment.clone());
            emitter.publish_event(event).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}
