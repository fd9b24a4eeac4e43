#[cfg(test)]
mod tests {
    use super::super::bus::EventBus;
    use super::super::event::{EventMessage, EventType};
    use anyhow::Result;

    #[tokio::test]
    async fn test_publish_subscribe() -> Result<()> {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            EventType::SystemStartup,
            None,
            serde_json::json!({"test": true}),
        )?;

        let event = rx.recv().await?;
        assert_eq!(event.event_type, EventType::SystemStartup);
        assert_eq!(event.payload["test"], true);

        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_preserves_order() -> Result<()> {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(EventType::AlertRaised, Some("ACC-1".to_string()), ())?;
        bus.publish(EventType::AlertDispatched, Some("ACC-1".to_string()), ())?;

        assert_eq!(rx.recv().await?.event_type, EventType::AlertRaised);
        assert_eq!(rx.recv().await?.event_type, EventType::AlertDispatched);

        Ok(())
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = EventBus::default();
        assert!(bus
            .publish(EventType::SystemShutdown, None, ())
            .is_ok());
    }

    #[test]
    fn test_routing_keys() {
        let event = EventMessage::new_empty(EventType::AlertRaised, Some("ACC-9".to_string()));
        assert_eq!(event.routing_key(), "alert.raised.ACC-9");

        let event = EventMessage::new_empty(EventType::SystemStartup, None);
        assert_eq!(event.routing_key(), "system.startup");
    }
}
