use crate::messaging::bus::EventBus;
use crate::messaging::event::EventType;
use anyhow::Result;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration};

use super::health::HealthMonitor;

/// Periodic task replacing the network metrics sample.
/// Independent of the alert feed timer.
pub struct MetricsSampler {
    health: Arc<HealthMonitor>,
    bus: EventBus,
    interval_secs: u64,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl MetricsSampler {
    pub fn new(health: Arc<HealthMonitor>, bus: EventBus, interval_secs: u64) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            health,
            bus,
            interval_secs,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn start(self: Arc<Self>) -> Result<()> {
        info!("Starting metrics sampler: every {}s", self.interval_secs);

        let mut shutdown = self.shutdown_rx.clone();
        let sampler = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(sampler.interval_secs));
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = sampler.sample().await {
                            error!("Metrics sample failed: {}", e);
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("Metrics sampler stopped");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    pub async fn sample(&self) -> Result<()> {
        let metrics = self.health.sample_metrics().await;
        if let Err(e) = self.bus.publish(EventType::MetricsUpdated, None, &metrics) {
            warn!("Failed to publish metrics update: {}", e);
        }
        Ok(())
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}
