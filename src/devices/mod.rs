use crate::error::Error;
use crate::simulation::seed;
use crate::storage::models::v2x_models::{DeviceConfig, Obu, ObuStatus, Rsu, RsuStatus};
use anyhow::Result;
use log::info;
use tokio::sync::RwLock;

/// Registry of the simulated roadside and onboard units, plus their
/// tunable configurations.
pub struct DeviceRegistry {
    rsus: RwLock<Vec<Rsu>>,
    obus: RwLock<Vec<Obu>>,
    configs: RwLock<Vec<DeviceConfig>>,
}

impl DeviceRegistry {
    /// Build the registry from the seeded world
    pub fn new() -> Self {
        Self {
            rsus: RwLock::new(seed::seed_rsus()),
            obus: RwLock::new(seed::seed_obus()),
            configs: RwLock::new(seed::seed_device_configs()),
        }
    }

    pub async fn rsus(&self) -> Vec<Rsu> {
        self.rsus.read().await.clone()
    }

    pub async fn obus(&self) -> Vec<Obu> {
        self.obus.read().await.clone()
    }

    pub async fn rsu_count(&self) -> usize {
        self.rsus.read().await.len()
    }

    pub async fn online_rsu_count(&self) -> usize {
        self.rsus
            .read()
            .await
            .iter()
            .filter(|r| r.status == RsuStatus::Online)
            .count()
    }

    pub async fn active_obu_count(&self) -> usize {
        self.obus
            .read()
            .await
            .iter()
            .filter(|o| o.status == ObuStatus::Active)
            .count()
    }

    /// Mean RSU uptime percentage
    pub async fn average_rsu_uptime(&self) -> f32 {
        let rsus = self.rsus.read().await;
        if rsus.is_empty() {
            return 0.0;
        }
        rsus.iter().map(|r| r.uptime).sum::<f32>() / rsus.len() as f32
    }

    pub async fn configs(&self) -> Vec<DeviceConfig> {
        self.configs.read().await.clone()
    }

    pub async fn config(&self, device_id: &str) -> Option<DeviceConfig> {
        self.configs
            .read()
            .await
            .iter()
            .find(|c| c.device_id == device_id)
            .cloned()
    }

    /// Replace a device configuration. The device must already be known and
    /// the intervals must be non-zero; a rejected update mutates nothing.
    pub async fn update_config(&self, update: DeviceConfig) -> Result<DeviceConfig> {
        if update.retry_interval == 0 || update.update_interval == 0 || update.ttl == 0 {
            return Err(Error::Validation(format!(
                "Intervals for {} must be non-zero",
                update.device_id
            ))
            .into());
        }

        let mut configs = self.configs.write().await;
        let slot = configs
            .iter_mut()
            .find(|c| c.device_id == update.device_id)
            .ok_or_else(|| Error::NotFound(format!("Device not found: {}", update.device_id)))?;

        // device identity is fixed; only the tunables move
        if slot.device_type != update.device_type {
            return Err(Error::Validation(format!(
                "Device type of {} cannot be changed",
                update.device_id
            ))
            .into());
        }

        *slot = update.clone();
        info!("Configuration updated for {}", update.device_id);
        Ok(update)
    }

    /// Restore a device configuration to its seeded defaults
    pub async fn reset_config(&self, device_id: &str) -> Result<DeviceConfig> {
        let default = seed::seed_device_configs()
            .into_iter()
            .find(|c| c.device_id == device_id)
            .ok_or_else(|| Error::NotFound(format!("Device not found: {}", device_id)))?;

        let mut configs = self.configs.write().await;
        let slot = configs
            .iter_mut()
            .find(|c| c.device_id == device_id)
            .ok_or_else(|| Error::NotFound(format!("Device not found: {}", device_id)))?;

        *slot = default.clone();
        info!("Configuration reset for {}", device_id);
        Ok(default)
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_reflect_seeded_statuses() {
        let registry = DeviceRegistry::new();
        assert_eq!(registry.rsu_count().await, 4);
        assert_eq!(registry.online_rsu_count().await, 3);
        assert_eq!(registry.active_obu_count().await, 3);
    }

    #[tokio::test]
    async fn update_is_visible_to_subsequent_reads() {
        let registry = DeviceRegistry::new();
        let mut config = registry.config("RSU-001").await.unwrap();
        config.broadcast_radius = 750;
        config.enable_logging = false;

        registry.update_config(config).await.unwrap();

        let read = registry.config("RSU-001").await.unwrap();
        assert_eq!(read.broadcast_radius, 750);
        assert!(!read.enable_logging);
    }

    #[tokio::test]
    async fn zero_interval_update_is_rejected_without_mutation() {
        let registry = DeviceRegistry::new();
        let mut config = registry.config("RSU-001").await.unwrap();
        let original = config.clone();
        config.retry_interval = 0;

        assert!(registry.update_config(config).await.is_err());
        let read = registry.config("RSU-001").await.unwrap();
        assert_eq!(read.retry_interval, original.retry_interval);
    }

    #[tokio::test]
    async fn unknown_device_update_is_rejected() {
        let registry = DeviceRegistry::new();
        let mut config = registry.config("RSU-001").await.unwrap();
        config.device_id = "RSU-999".to_string();
        assert!(registry.update_config(config).await.is_err());
    }

    #[tokio::test]
    async fn reset_restores_seeded_values() {
        let registry = DeviceRegistry::new();
        let seeded = registry.config("OBU-1001").await.unwrap();

        let mut config = seeded.clone();
        config.ttl = 90;
        registry.update_config(config).await.unwrap();

        let restored = registry.reset_config("OBU-1001").await.unwrap();
        assert_eq!(restored.ttl, seeded.ttl);
        assert_eq!(registry.config("OBU-1001").await.unwrap().ttl, seeded.ttl);
    }
}
