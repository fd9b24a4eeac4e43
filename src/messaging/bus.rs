use crate::error::Error;
use crate::messaging::event::{EventMessage, EventType};
use anyhow::Result;
use log::debug;
use serde::Serialize;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// In-process event fan-out.
///
/// Delivery is fire-and-forget: publishing never blocks, an absent
/// subscriber is not an error, and a lagging subscriber drops the oldest
/// events rather than backpressuring the publisher.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event
    pub fn publish<T: Serialize>(
        &self,
        event_type: EventType,
        source_id: Option<String>,
        payload: T,
    ) -> Result<()> {
        let event = EventMessage::new(event_type, source_id, payload)
            .map_err(|e| Error::Serialization(format!("Failed to encode event: {}", e)))?;

        debug!("Publishing event: {}", event.routing_key());

        // no receivers is fine
        let _ = self.tx.send(event);
        Ok(())
    }

    /// Subscribe to all events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
