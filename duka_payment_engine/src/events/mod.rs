mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::OrderPaidEvent;
pub use hooks::{EventProducers, EventSubscriptions};
