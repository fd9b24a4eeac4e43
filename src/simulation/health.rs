use crate::storage::models::alert_models::SystemHealth;
use crate::storage::models::v2x_models::NetworkMetrics;
use chrono::Utc;
use rand::{thread_rng, Rng};
use tokio::sync::RwLock;

use super::generator::initial_health;

/// Owns the singleton health snapshot and the latest network metrics
/// sample. Both are replaced wholesale; no history is retained.
pub struct HealthMonitor {
    health: RwLock<SystemHealth>,
    metrics: RwLock<NetworkMetrics>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self {
            health: RwLock::new(initial_health()),
            metrics: RwLock::new(initial_metrics()),
        }
    }

    pub async fn health(&self) -> SystemHealth {
        self.health.read().await.clone()
    }

    pub async fn metrics(&self) -> NetworkMetrics {
        self.metrics.read().await.clone()
    }

    /// Perturb the health sample within its fixed jitter bands:
    /// connectivity 95 + [0,5) %, latency 40 + [0,20) ms.
    pub async fn jitter_health(&self) -> SystemHealth {
        let (connectivity, latency) = {
            let mut rng = thread_rng();
            (95 + rng.gen_range(0..5), 40 + rng.gen_range(0..20))
        };

        let mut health = self.health.write().await;
        health.vanet_connectivity = connectivity;
        health.database_latency = latency;
        health.last_update = Utc::now();
        health.clone()
    }

    /// Replace the network metrics sample wholesale
    pub async fn sample_metrics(&self) -> NetworkMetrics {
        let sample = {
            let mut rng = thread_rng();
            NetworkMetrics {
                packet_delivery_ratio: 95.0 + rng.gen::<f64>() * 5.0,
                average_latency: 10.0 + rng.gen::<f64>() * 10.0,
                duplicate_packet_ratio: rng.gen::<f64>() * 2.0,
                throughput: 2000.0 + rng.gen::<f64>() * 1000.0,
                active_connections: 300 + rng.gen_range(0..50),
                timestamp: Utc::now(),
            }
        };

        let mut metrics = self.metrics.write().await;
        *metrics = sample.clone();
        sample
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn initial_metrics() -> NetworkMetrics {
    NetworkMetrics {
        packet_delivery_ratio: 98.5,
        average_latency: 12.4,
        duplicate_packet_ratio: 0.8,
        throughput: 2400.0,
        active_connections: 320,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_jitter_stays_in_band() {
        let monitor = HealthMonitor::new();

        for _ in 0..50 {
            let health = monitor.jitter_health().await;
            assert!((95..100).contains(&health.vanet_connectivity));
            assert!((40..60).contains(&health.database_latency));
        }
    }

    #[tokio::test]
    async fn metrics_sample_stays_in_band() {
        let monitor = HealthMonitor::new();

        for _ in 0..50 {
            let metrics = monitor.sample_metrics().await;
            assert!(metrics.packet_delivery_ratio >= 95.0 && metrics.packet_delivery_ratio < 100.0);
            assert!(metrics.average_latency >= 10.0 && metrics.average_latency < 20.0);
            assert!(metrics.duplicate_packet_ratio < 2.0);
            assert!(metrics.throughput >= 2000.0 && metrics.throughput < 3000.0);
            assert!((300..350).contains(&metrics.active_connections));
        }
    }

    #[tokio::test]
    async fn sample_replaces_snapshot() {
        let monitor = HealthMonitor::new();
        let before = monitor.metrics().await;
        let after = monitor.sample_metrics().await;
        assert!(after.timestamp >= before.timestamp);
        assert_eq!(monitor.metrics().await.timestamp, after.timestamp);
    }
}
