use super::alert_models::{Coordinates, SeverityLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roadside unit: fixed infrastructure node in the vehicular network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rsu {
    pub id: String,
    pub name: String,
    pub location: Coordinates,
    pub address: String,
    pub status: RsuStatus,
    /// Uptime percentage
    pub uptime: f32,
    /// Coverage radius in meters
    pub coverage_radius: u32,
    pub connected_vehicles: u32,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub last_heartbeat: DateTime<Utc>,
    pub firmware: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsuStatus {
    Online,
    Offline,
    Maintenance,
}

/// Onboard unit: in-vehicle network node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obu {
    pub id: String,
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub status: ObuStatus,
    pub location: Coordinates,
    /// km/h
    pub speed: u32,
    /// heading in degrees
    pub direction: u16,
    pub connected_rsu: Option<String>,
    /// Signal strength percentage
    pub signal_strength: u8,
    pub last_seen: DateTime<Utc>,
    pub firmware: String,
    pub battery_level: Option<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObuStatus {
    Active,
    Inactive,
    Error,
}

/// Sampled VANET performance figures, replaced wholesale each sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Percentage
    pub packet_delivery_ratio: f64,
    /// Milliseconds
    pub average_latency: f64,
    /// Percentage
    pub duplicate_packet_ratio: f64,
    /// kbps
    pub throughput: f64,
    pub active_connections: u32,
    pub timestamp: DateTime<Utc>,
}

/// Historical incident record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentLog {
    pub id: String,
    pub accident_id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: SeverityLevel,
    pub location: Coordinates,
    pub address: String,
    pub vehicle_id: String,
    pub status: IncidentStatus,
    /// Seconds from report to response, when responded
    pub response_time: Option<u32>,
    pub dispatched_units: Vec<String>,
    pub notes: String,
    /// 0-100
    pub confidence_score: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Pending,
    Acknowledged,
    Verified,
    Resolved,
}

impl IncidentStatus {
    /// Parse a query-string filter value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "acknowledged" => Some(Self::Acknowledged),
            "verified" => Some(Self::Verified),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// Per-device tunable configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub device_id: String,
    pub device_type: DeviceType,
    /// Milliseconds
    pub retry_interval: u32,
    /// Message time to live in seconds
    pub ttl: u32,
    /// Meters
    pub broadcast_radius: u32,
    pub network_mode: NetworkMode,
    /// Milliseconds
    pub update_interval: u32,
    pub enable_logging: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceType {
    #[serde(rename = "RSU")]
    Rsu,
    #[serde(rename = "OBU")]
    Obu,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NetworkMode {
    #[serde(rename = "LoRa")]
    LoRa,
    #[serde(rename = "DSRC")]
    Dsrc,
    #[serde(rename = "C-V2X")]
    CV2x,
}
