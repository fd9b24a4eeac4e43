use crate::simulation::seed;
use crate::storage::models::v2x_models::{IncidentLog, IncidentStatus};
use tokio::sync::RwLock;

/// Filter for the incident history
#[derive(Debug, Default, Clone)]
pub struct IncidentQuery {
    /// Case-insensitive match against accident id, address or vehicle id
    pub search: Option<String>,
    pub status: Option<IncidentStatus>,
}

/// Seeded incident history with search and status filtering
pub struct IncidentLogBook {
    logs: RwLock<Vec<IncidentLog>>,
}

impl IncidentLogBook {
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(seed::seed_incident_logs()),
        }
    }

    pub async fn all(&self) -> Vec<IncidentLog> {
        self.logs.read().await.clone()
    }

    pub async fn query(&self, query: &IncidentQuery) -> Vec<IncidentLog> {
        let needle = query.search.as_deref().map(str::to_lowercase);

        self.logs
            .read()
            .await
            .iter()
            .filter(|log| {
                let matches_search = match &needle {
                    Some(term) => {
                        log.accident_id.to_lowercase().contains(term)
                            || log.address.to_lowercase().contains(term)
                            || log.vehicle_id.to_lowercase().contains(term)
                    }
                    None => true,
                };
                let matches_status = match query.status {
                    Some(status) => log.status == status,
                    None => true,
                };
                matches_search && matches_status
            })
            .cloned()
            .collect()
    }

    /// Render logs as CSV for export
    pub fn export_csv(logs: &[IncidentLog]) -> String {
        let mut out = String::from(
            "id,accident_id,timestamp,severity,lat,lng,address,vehicle_id,status,response_time,dispatched_units,confidence_score,notes\n",
        );

        for log in logs {
            let units = log.dispatched_units.join("; ");
            let response = log
                .response_time
                .map(|s| s.to_string())
                .unwrap_or_default();
            out.push_str(&format!(
                "{},{},{},{:?},{:.4},{:.4},{},{},{:?},{},{},{},{}\n",
                log.id,
                log.accident_id,
                log.timestamp.to_rfc3339(),
                log.severity,
                log.location.lat,
                log.location.lng,
                csv_field(&log.address),
                log.vehicle_id,
                log.status,
                response,
                csv_field(&units),
                log.confidence_score,
                csv_field(&log.notes),
            ));
        }

        out
    }
}

impl Default for IncidentLogBook {
    fn default() -> Self {
        Self::new()
    }
}

// Quote fields that contain separators
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unfiltered_query_returns_everything() {
        let book = IncidentLogBook::new();
        let all = book.query(&IncidentQuery::default()).await;
        assert_eq!(all.len(), book.all().await.len());
    }

    #[tokio::test]
    async fn search_matches_accident_id_address_and_vehicle() {
        let book = IncidentLogBook::new();

        let by_accident = book
            .query(&IncidentQuery {
                search: Some("acc-0987".to_string()),
                status: None,
            })
            .await;
        assert_eq!(by_accident.len(), 1);
        assert_eq!(by_accident[0].accident_id, "ACC-0987");

        let by_address = book
            .query(&IncidentQuery {
                search: Some("tunnel".to_string()),
                status: None,
            })
            .await;
        assert!(!by_address.is_empty());
        assert!(by_address
            .iter()
            .all(|l| l.address.to_lowercase().contains("tunnel")));

        let by_vehicle = book
            .query(&IncidentQuery {
                search: Some("VEH-9012".to_string()),
                status: None,
            })
            .await;
        assert_eq!(by_vehicle.len(), 1);
    }

    #[tokio::test]
    async fn status_filter_composes_with_search() {
        let book = IncidentLogBook::new();

        let resolved = book
            .query(&IncidentQuery {
                search: None,
                status: Some(IncidentStatus::Resolved),
            })
            .await;
        assert!(resolved
            .iter()
            .all(|l| l.status == IncidentStatus::Resolved));

        let none = book
            .query(&IncidentQuery {
                search: Some("tunnel".to_string()),
                status: Some(IncidentStatus::Resolved),
            })
            .await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn csv_export_has_a_row_per_log() {
        let book = IncidentLogBook::new();
        let logs = book.all().await;
        let csv = IncidentLogBook::export_csv(&logs);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), logs.len() + 1);
        assert!(lines[0].starts_with("id,accident_id"));
        // comma-bearing notes are quoted
        assert!(csv.contains("\"Two-vehicle collision, both occupants transported\""));
    }
}
