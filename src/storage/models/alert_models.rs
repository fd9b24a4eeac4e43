use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accident severity, ordered by triage priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Critical,
    Warning,
    Moderate,
}

impl SeverityLevel {
    /// Triage rank; lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
            Self::Moderate => 2,
        }
    }
}

/// Alert lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Dispatched,
    Resolved,
}

/// Injury likelihood, derived from severity at creation and never mutated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InjuryLikelihood {
    High,
    Medium,
    Low,
}

impl InjuryLikelihood {
    pub fn from_severity(severity: SeverityLevel) -> Self {
        match severity {
            SeverityLevel::Critical => Self::High,
            SeverityLevel::Warning => Self::Medium,
            SeverityLevel::Moderate => Self::Low,
        }
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Vehicle descriptor attached to an alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleData {
    pub id: String,
    pub vehicle_type: String,
    /// km/h
    pub speed: u32,
    /// heading in degrees
    pub direction: u16,
}

/// A reported accident incident
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccidentAlert {
    pub id: String,
    pub severity: SeverityLevel,
    pub status: AlertStatus,
    pub location: Coordinates,
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub vehicle: VehicleData,
    /// Estimated dispatch arrival in seconds
    pub dispatch_eta: u32,
    pub description: String,
    /// Originating network node
    pub node_id: String,
    /// Impact force score, 0-100
    pub impact_force: Option<u8>,
    pub injury_likelihood: Option<InjuryLikelihood>,
}

/// Aggregate service status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Online,
    Degraded,
    Offline,
}

/// Periodic sample of aggregate network/service status.
/// Replaced wholesale each tick; no history retained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemHealth {
    /// VANET connectivity percentage
    pub vanet_connectivity: u8,
    /// Database latency in milliseconds
    pub database_latency: u32,
    pub api_status: ApiStatus,
    pub last_update: DateTime<Utc>,
}
