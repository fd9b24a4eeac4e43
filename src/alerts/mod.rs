use crate::error::Error;
use crate::storage::models::alert_models::{AccidentAlert, AlertStatus};
use anyhow::Result;
use tokio::sync::RwLock;

/// Process-wide alert collection.
///
/// Owns the ordered set of accident alerts and the operator's current
/// selection. Views receive projections of this store; there is exactly one
/// instance per process. Alerts are never deleted — the feed may truncate
/// the oldest entries when a cap is configured.
pub struct AlertStore {
    alerts: RwLock<Vec<AccidentAlert>>,
    selected: RwLock<Option<String>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::with_alerts(Vec::new())
    }

    pub fn with_alerts(seed: Vec<AccidentAlert>) -> Self {
        let selected = seed.first().map(|a| a.id.clone());
        Self {
            alerts: RwLock::new(seed),
            selected: RwLock::new(selected),
        }
    }

    /// Insertion-ordered snapshot, newest first
    pub async fn snapshot(&self) -> Vec<AccidentAlert> {
        self.alerts.read().await.clone()
    }

    /// Snapshot in triage order: `new` alerts before any other status,
    /// then by severity rank. Stable within ties.
    pub async fn triage_order(&self) -> Vec<AccidentAlert> {
        let mut alerts = self.snapshot().await;
        alerts.sort_by_key(|a| (a.status != AlertStatus::New, a.severity.rank()));
        alerts
    }

    pub async fn get(&self, id: &str) -> Option<AccidentAlert> {
        self.alerts.read().await.iter().find(|a| a.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.alerts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.alerts.read().await.is_empty()
    }

    /// Number of alerts still awaiting a response
    pub async fn active_count(&self) -> usize {
        self.alerts
            .read()
            .await
            .iter()
            .filter(|a| a.status == AlertStatus::New)
            .count()
    }

    pub async fn dispatched_count(&self) -> usize {
        self.alerts
            .read()
            .await
            .iter()
            .filter(|a| a.status == AlertStatus::Dispatched)
            .count()
    }

    /// Prepend a freshly generated alert. When `cap` is set the store is
    /// truncated to the most recent `cap` entries.
    pub async fn push_front(&self, alert: AccidentAlert, cap: Option<usize>) {
        let mut alerts = self.alerts.write().await;
        alerts.insert(0, alert);
        if let Some(cap) = cap {
            alerts.truncate(cap);
        }
    }

    /// Record the operator's highlighted alert. Pure view state: any alert
    /// in the store is selectable, and the previous selection is replaced.
    pub async fn select(&self, id: &str) -> Option<AccidentAlert> {
        let alert = self.get(id).await;
        *self.selected.write().await = Some(id.to_string());
        alert
    }

    pub async fn selected(&self) -> Option<AccidentAlert> {
        let id = self.selected.read().await.clone()?;
        self.get(&id).await
    }

    /// Mark an alert acknowledged. Valid only from `new`.
    pub async fn acknowledge(&self, id: &str) -> Result<AccidentAlert> {
        self.transition(id, AlertStatus::Acknowledged, &[AlertStatus::New])
            .await
    }

    /// Mark emergency response assigned. Valid from `new` or `acknowledged`;
    /// only the status field changes.
    pub async fn dispatch(&self, id: &str) -> Result<AccidentAlert> {
        self.transition(
            id,
            AlertStatus::Dispatched,
            &[AlertStatus::New, AlertStatus::Acknowledged],
        )
        .await
    }

    /// Close out a dispatched alert
    pub async fn resolve(&self, id: &str) -> Result<AccidentAlert> {
        self.transition(id, AlertStatus::Resolved, &[AlertStatus::Dispatched])
            .await
    }

    // Unknown ids and invalid source states reject without mutating the store.
    async fn transition(
        &self,
        id: &str,
        to: AlertStatus,
        valid_from: &[AlertStatus],
    ) -> Result<AccidentAlert> {
        let mut alerts = self.alerts.write().await;

        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("Alert not found: {}", id)))?;

        if !valid_from.contains(&alert.status) {
            return Err(Error::Validation(format!(
                "Alert {} cannot move from {:?} to {:?}",
                id, alert.status, to
            ))
            .into());
        }

        alert.status = to;
        Ok(alert.clone())
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::generator::AlertGenerator;
    use crate::storage::models::alert_models::{
        Coordinates, SeverityLevel, VehicleData,
    };
    use chrono::Utc;

    fn alert(id: &str, severity: SeverityLevel, status: AlertStatus) -> AccidentAlert {
        AccidentAlert {
            id: id.to_string(),
            severity,
            status,
            location: Coordinates {
                lat: 40.7128,
                lng: -74.0060,
            },
            address: "Veterans Memorial Parkway".to_string(),
            timestamp: Utc::now(),
            vehicle: VehicleData {
                id: "VEH-1".to_string(),
                vehicle_type: "Sedan".to_string(),
                speed: 40,
                direction: 90,
            },
            dispatch_eta: 180,
            description: "Minor vehicle incident".to_string(),
            node_id: "NODE-1".to_string(),
            impact_force: Some(50),
            injury_likelihood: None,
        }
    }

    #[tokio::test]
    async fn dispatch_changes_only_status() {
        let generator = AlertGenerator::new();
        let original = generator.generate(None);
        let store = AlertStore::with_alerts(vec![original.clone()]);

        let dispatched = store.dispatch(&original.id).await.unwrap();

        assert_eq!(dispatched.status, AlertStatus::Dispatched);
        let expected = AccidentAlert {
            status: AlertStatus::Dispatched,
            ..original
        };
        assert_eq!(dispatched, expected);
    }

    #[tokio::test]
    async fn dispatch_unknown_id_leaves_store_unchanged() {
        let store = AlertStore::with_alerts(vec![alert(
            "ACC-1",
            SeverityLevel::Critical,
            AlertStatus::New,
        )]);

        let before = store.snapshot().await;
        let result = store.dispatch("ACC-missing").await;

        assert!(result.is_err());
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn new_sorts_before_dispatched_regardless_of_severity() {
        let store = AlertStore::with_alerts(vec![
            alert("ACC-1", SeverityLevel::Moderate, AlertStatus::New),
            alert("ACC-2", SeverityLevel::Critical, AlertStatus::Dispatched),
        ]);

        let ordered = store.triage_order().await;
        assert_eq!(ordered[0].id, "ACC-1");
        assert_eq!(ordered[1].id, "ACC-2");
    }

    #[tokio::test]
    async fn triage_order_ranks_severity_within_status() {
        let store = AlertStore::with_alerts(vec![
            alert("ACC-1", SeverityLevel::Moderate, AlertStatus::New),
            alert("ACC-2", SeverityLevel::Critical, AlertStatus::New),
            alert("ACC-3", SeverityLevel::Warning, AlertStatus::New),
            alert("ACC-4", SeverityLevel::Critical, AlertStatus::Dispatched),
            alert("ACC-5", SeverityLevel::Warning, AlertStatus::Dispatched),
        ]);

        let ids: Vec<String> = store
            .triage_order()
            .await
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["ACC-2", "ACC-3", "ACC-1", "ACC-4", "ACC-5"]);
    }

    #[tokio::test]
    async fn resolve_requires_dispatched() {
        let store = AlertStore::with_alerts(vec![alert(
            "ACC-1",
            SeverityLevel::Warning,
            AlertStatus::New,
        )]);

        assert!(store.resolve("ACC-1").await.is_err());
        assert_eq!(store.get("ACC-1").await.unwrap().status, AlertStatus::New);

        store.dispatch("ACC-1").await.unwrap();
        let resolved = store.resolve("ACC-1").await.unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);
    }

    #[tokio::test]
    async fn acknowledged_path_reaches_dispatched() {
        let store = AlertStore::with_alerts(vec![alert(
            "ACC-1",
            SeverityLevel::Critical,
            AlertStatus::New,
        )]);

        store.acknowledge("ACC-1").await.unwrap();
        // double acknowledge is rejected
        assert!(store.acknowledge("ACC-1").await.is_err());

        let dispatched = store.dispatch("ACC-1").await.unwrap();
        assert_eq!(dispatched.status, AlertStatus::Dispatched);
    }

    #[tokio::test]
    async fn push_front_caps_to_most_recent() {
        let store = AlertStore::new();
        for i in 0..5 {
            store
                .push_front(
                    alert(&format!("ACC-{}", i), SeverityLevel::Moderate, AlertStatus::New),
                    Some(3),
                )
                .await;
        }

        let ids: Vec<String> = store.snapshot().await.into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["ACC-4", "ACC-3", "ACC-2"]);
    }

    #[tokio::test]
    async fn selection_tracks_highlighted_alert() {
        let store = AlertStore::with_alerts(vec![
            alert("ACC-1", SeverityLevel::Critical, AlertStatus::New),
            alert("ACC-2", SeverityLevel::Warning, AlertStatus::New),
        ]);

        // seeded store starts with the first alert highlighted
        assert_eq!(store.selected().await.unwrap().id, "ACC-1");

        store.select("ACC-2").await.unwrap();
        assert_eq!(store.selected().await.unwrap().id, "ACC-2");
    }
}
