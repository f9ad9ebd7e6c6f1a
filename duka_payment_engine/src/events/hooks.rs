//! Registration and wiring of engine event callbacks.
//!
//! The engine publishes exactly one event today: [`OrderPaidEvent`], emitted after reconciliation marks an order
//! as paid. Callers register any number of async callbacks on an [`EventSubscriptions`], hand the resulting
//! [`EventProducers`] to the flow API, and then [`EventSubscriptions::start`] the dispatch loops.
use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, OrderPaidEvent};

/// The sending side of the hook system, held by the flow API. Clones are cheap and publish into the same
/// dispatch loops.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_paid: Vec<EventProducer<OrderPaidEvent>>,
}

/// A set of not-yet-running event callbacks. Each registered callback gets its own channel, so a slow consumer
/// never starves the others.
pub struct EventSubscriptions {
    buffer_size: usize,
    order_paid: Vec<EventHandler<OrderPaidEvent>>,
}

impl EventSubscriptions {
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size, order_paid: Vec::new() }
    }

    /// Register an async callback to run every time an order is marked as paid.
    pub fn on_order_paid<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderPaidEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.order_paid.push(EventHandler::new(self.buffer_size, Arc::new(f)));
        self
    }

    /// Producers for the flow API to publish into. Call before [`Self::start`], which consumes the handlers.
    pub fn producers(&self) -> EventProducers {
        EventProducers { order_paid: self.order_paid.iter().map(EventHandler::subscribe).collect() }
    }

    /// Spawn one dispatch task per registered callback. Each loop runs until every producer has been dropped.
    pub fn start(self) {
        for handler in self.order_paid {
            tokio::spawn(handler.start_handler());
        }
    }
}
