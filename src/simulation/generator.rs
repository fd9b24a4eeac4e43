use crate::storage::models::alert_models::{
    AccidentAlert, AlertStatus, ApiStatus, Coordinates, InjuryLikelihood, SeverityLevel,
    SystemHealth, VehicleData,
};
use chrono::{Duration, Utc};
use rand::{thread_rng, Rng};
use std::sync::atomic::{AtomicU64, Ordering};

/// Base point for simulated incidents (lower Manhattan)
const BASE_LAT: f64 = 40.7128;
const BASE_LNG: f64 = -74.0060;

const ADDRESSES: [&str; 5] = [
    "Interstate 95, Mile Marker 127",
    "Main Street & 5th Avenue Intersection",
    "Highway 101 Northbound, Exit 42",
    "Oak Boulevard near Central Park",
    "Veterans Memorial Parkway",
];

const VEHICLE_TYPES: [&str; 4] = ["Sedan", "SUV", "Truck", "Motorcycle"];

fn description_for(severity: SeverityLevel) -> &'static str {
    match severity {
        SeverityLevel::Critical => "Multi-vehicle collision with potential injuries",
        SeverityLevel::Warning => "Single vehicle accident, possible property damage",
        SeverityLevel::Moderate => "Minor vehicle incident",
    }
}

/// Produces plausible synthetic accident alerts.
///
/// Ids are unique for the process lifetime: millisecond timestamp plus a
/// monotonically increasing counter.
pub struct AlertGenerator {
    counter: AtomicU64,
}

impl AlertGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1000),
        }
    }

    fn next_id(&self) -> String {
        format!(
            "ACC-{}-{}",
            Utc::now().timestamp_millis(),
            self.counter.fetch_add(1, Ordering::Relaxed)
        )
    }

    /// Generate a fresh alert. Severity is uniform over the three levels,
    /// injury likelihood follows deterministically from it, and every other
    /// attribute is drawn from the fixed bands of the simulated world.
    pub fn generate(&self, id: Option<String>) -> AccidentAlert {
        let mut rng = thread_rng();

        let severity = [
            SeverityLevel::Critical,
            SeverityLevel::Warning,
            SeverityLevel::Moderate,
        ][rng.gen_range(0..3)];

        AccidentAlert {
            id: id.unwrap_or_else(|| self.next_id()),
            severity,
            status: AlertStatus::New,
            location: Coordinates {
                lat: BASE_LAT + (rng.gen::<f64>() - 0.5) * 0.1,
                lng: BASE_LNG + (rng.gen::<f64>() - 0.5) * 0.1,
            },
            address: ADDRESSES[rng.gen_range(0..ADDRESSES.len())].to_string(),
            timestamp: Utc::now(),
            vehicle: VehicleData {
                id: format!("VEH-{}", rng.gen_range(0..10000)),
                vehicle_type: VEHICLE_TYPES[rng.gen_range(0..VEHICLE_TYPES.len())].to_string(),
                speed: rng.gen_range(20..100),
                direction: rng.gen_range(0..360),
            },
            dispatch_eta: rng.gen_range(120..420),
            description: description_for(severity).to_string(),
            node_id: format!("NODE-{}", rng.gen_range(0..100)),
            impact_force: Some(rng.gen_range(0..100)),
            injury_likelihood: Some(InjuryLikelihood::from_severity(severity)),
        }
    }
}

impl Default for AlertGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The two fixed alerts present at startup
pub fn seed_alerts() -> Vec<AccidentAlert> {
    let now = Utc::now();
    vec![
        AccidentAlert {
            id: "ACC-001".to_string(),
            severity: SeverityLevel::Critical,
            status: AlertStatus::New,
            location: Coordinates {
                lat: 40.7580,
                lng: -73.9855,
            },
            address: "Times Square, Manhattan".to_string(),
            timestamp: now - Duration::seconds(30),
            vehicle: VehicleData {
                id: "VEH-1234".to_string(),
                vehicle_type: "Sedan".to_string(),
                speed: 45,
                direction: 180,
            },
            dispatch_eta: 180,
            description: description_for(SeverityLevel::Critical).to_string(),
            node_id: "NODE-42".to_string(),
            impact_force: Some(85),
            injury_likelihood: Some(InjuryLikelihood::High),
        },
        AccidentAlert {
            id: "ACC-002".to_string(),
            severity: SeverityLevel::Warning,
            status: AlertStatus::New,
            location: Coordinates {
                lat: 40.7489,
                lng: -73.9680,
            },
            address: "Queens Midtown Tunnel".to_string(),
            timestamp: now - Duration::seconds(120),
            vehicle: VehicleData {
                id: "VEH-5678".to_string(),
                vehicle_type: "SUV".to_string(),
                speed: 30,
                direction: 90,
            },
            dispatch_eta: 240,
            description: description_for(SeverityLevel::Warning).to_string(),
            node_id: "NODE-17".to_string(),
            impact_force: Some(45),
            injury_likelihood: Some(InjuryLikelihood::Medium),
        },
    ]
}

/// Health snapshot present at startup
pub fn initial_health() -> SystemHealth {
    SystemHealth {
        vanet_connectivity: 98,
        database_latency: 45,
        api_status: ApiStatus::Online,
        last_update: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_alerts_stay_in_band() {
        let generator = AlertGenerator::new();

        for _ in 0..200 {
            let alert = generator.generate(None);

            assert!(matches!(
                alert.severity,
                SeverityLevel::Critical | SeverityLevel::Warning | SeverityLevel::Moderate
            ));
            assert_eq!(alert.status, AlertStatus::New);
            assert!(alert.impact_force.unwrap() < 100);
            assert!((120..420).contains(&alert.dispatch_eta));
            assert!((20..100).contains(&alert.vehicle.speed));
            assert!(alert.vehicle.direction < 360);
            assert!((alert.location.lat - BASE_LAT).abs() <= 0.05);
            assert!((alert.location.lng - BASE_LNG).abs() <= 0.05);
            assert!(ADDRESSES.contains(&alert.address.as_str()));
        }
    }

    #[test]
    fn injury_likelihood_follows_severity() {
        let generator = AlertGenerator::new();

        for _ in 0..200 {
            let alert = generator.generate(None);
            let expected = match alert.severity {
                SeverityLevel::Critical => InjuryLikelihood::High,
                SeverityLevel::Warning => InjuryLikelihood::Medium,
                SeverityLevel::Moderate => InjuryLikelihood::Low,
            };
            assert_eq!(alert.injury_likelihood, Some(expected));
        }
    }

    #[test]
    fn ids_are_unique() {
        let generator = AlertGenerator::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generator.generate(None).id));
        }
    }

    #[test]
    fn explicit_id_is_honored() {
        let generator = AlertGenerator::new();
        let alert = generator.generate(Some("ACC-X".to_string()));
        assert_eq!(alert.id, "ACC-X");
    }

    #[test]
    fn seed_alerts_are_pending_response() {
        let seeds = seed_alerts();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].id, "ACC-001");
        assert_eq!(seeds[0].severity, SeverityLevel::Critical);
        assert_eq!(seeds[1].id, "ACC-002");
        assert!(seeds.iter().all(|a| a.status == AlertStatus::New));
    }
}
