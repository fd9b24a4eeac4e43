use crate::alerts::AlertStore;
use crate::config::SimulationConfig;
use crate::messaging::bus::EventBus;
use crate::messaging::event::EventType;
use crate::storage::models::alert_models::AccidentAlert;
use anyhow::Result;
use log::{error, info, warn};
use rand::{thread_rng, Rng};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration};

use super::generator::AlertGenerator;
use super::health::HealthMonitor;

/// Periodic task advancing the simulated world.
///
/// Each tick spawns a new alert with the configured probability and jitters
/// the health sample. The task is owned by the process and stopped with an
/// explicit `shutdown`, not dropped with its consumer.
pub struct AlertFeed {
    store: Arc<AlertStore>,
    health: Arc<HealthMonitor>,
    generator: AlertGenerator,
    bus: EventBus,
    config: SimulationConfig,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl AlertFeed {
    pub fn new(
        store: Arc<AlertStore>,
        health: Arc<HealthMonitor>,
        bus: EventBus,
        config: SimulationConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            store,
            health,
            generator: AlertGenerator::new(),
            bus,
            config,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Start the feed task
    pub fn start(self: Arc<Self>) -> Result<()> {
        info!(
            "Starting alert feed: tick every {}s, spawn probability {}",
            self.config.tick_interval_secs, self.config.spawn_probability
        );

        let mut shutdown = self.shutdown_rx.clone();
        let feed = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(feed.config.tick_interval_secs));
            // the first interval tick fires immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = feed.tick().await {
                            error!("Alert feed tick failed: {}", e);
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("Alert feed stopped");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    /// Run one tick of the simulated world. Returns the alert spawned this
    /// tick, if any.
    pub async fn tick(&self) -> Result<Option<AccidentAlert>> {
        let spawn = { thread_rng().gen::<f64>() < self.config.spawn_probability };

        let mut raised = None;
        if spawn {
            let alert = self.generator.generate(None);
            self.store
                .push_front(alert.clone(), self.config.max_alerts)
                .await;

            // fire-and-forget: a lost notification never fails the tick
            if let Err(e) = self.bus.publish(
                EventType::AlertRaised,
                Some(alert.id.clone()),
                serde_json::json!({
                    "severity": alert.severity,
                    "address": alert.address,
                }),
            ) {
                warn!("Failed to publish alert notification: {}", e);
            }

            raised = Some(alert);
        }

        let health = self.health.jitter_health().await;
        if let Err(e) = self
            .bus
            .publish(EventType::HealthUpdated, None, &health)
        {
            warn!("Failed to publish health update: {}", e);
        }

        Ok(raised)
    }

    /// Stop the feed task
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::event::EventType;

    fn feed(config: SimulationConfig) -> (Arc<AlertStore>, EventBus, AlertFeed) {
        let store = Arc::new(AlertStore::new());
        let health = Arc::new(HealthMonitor::new());
        let bus = EventBus::default();
        let feed = AlertFeed::new(store.clone(), health, bus.clone(), config);
        (store, bus, feed)
    }

    #[tokio::test]
    async fn certain_spawn_appends_one_alert_per_tick() {
        let (store, _bus, feed) = feed(SimulationConfig {
            spawn_probability: 1.0,
            ..SimulationConfig::default()
        });

        let raised = feed.tick().await.unwrap();
        assert!(raised.is_some());
        assert_eq!(store.len().await, 1);

        feed.tick().await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn zero_probability_never_spawns() {
        let (store, _bus, feed) = feed(SimulationConfig {
            spawn_probability: 0.0,
            ..SimulationConfig::default()
        });

        for _ in 0..10 {
            assert!(feed.tick().await.unwrap().is_none());
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn feed_respects_alert_cap() {
        let (store, _bus, feed) = feed(SimulationConfig {
            spawn_probability: 1.0,
            max_alerts: Some(3),
            ..SimulationConfig::default()
        });

        for _ in 0..6 {
            feed.tick().await.unwrap();
        }
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn spawned_alert_is_announced() {
        let (_store, bus, feed) = feed(SimulationConfig {
            spawn_probability: 1.0,
            ..SimulationConfig::default()
        });

        let mut rx = bus.subscribe();
        let raised = feed.tick().await.unwrap().unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::AlertRaised);
        assert_eq!(event.source_id.as_deref(), Some(raised.id.as_str()));
        assert_eq!(event.payload["address"], raised.address);
    }
}
