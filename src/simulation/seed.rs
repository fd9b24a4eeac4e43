use crate::storage::models::alert_models::{Coordinates, SeverityLevel};
use crate::storage::models::v2x_models::{
    DeviceConfig, DeviceType, IncidentLog, IncidentStatus, NetworkMode, Obu, ObuStatus, Rsu,
    RsuStatus,
};
use chrono::{Duration, Utc};

/// Roadside units present at startup
pub fn seed_rsus() -> Vec<Rsu> {
    let now = Utc::now();
    vec![
        Rsu {
            id: "RSU-001".to_string(),
            name: "Times Square North".to_string(),
            location: Coordinates {
                lat: 40.7589,
                lng: -73.9851,
            },
            address: "Broadway & W 47th St".to_string(),
            status: RsuStatus::Online,
            uptime: 99.2,
            coverage_radius: 500,
            connected_vehicles: 42,
            packets_sent: 1_284_503,
            packets_received: 1_271_887,
            last_heartbeat: now - Duration::seconds(4),
            firmware: "2.4.1".to_string(),
            ip_address: "10.20.1.11".to_string(),
        },
        Rsu {
            id: "RSU-002".to_string(),
            name: "Midtown Tunnel East".to_string(),
            location: Coordinates {
                lat: 40.7440,
                lng: -73.9712,
            },
            address: "E 37th St & Tunnel Approach".to_string(),
            status: RsuStatus::Online,
            uptime: 98.7,
            coverage_radius: 400,
            connected_vehicles: 35,
            packets_sent: 978_240,
            packets_received: 965_113,
            last_heartbeat: now - Duration::seconds(7),
            firmware: "2.4.1".to_string(),
            ip_address: "10.20.1.12".to_string(),
        },
        Rsu {
            id: "RSU-003".to_string(),
            name: "Central Park South".to_string(),
            location: Coordinates {
                lat: 40.7653,
                lng: -73.9772,
            },
            address: "59th St & 6th Ave".to_string(),
            status: RsuStatus::Maintenance,
            uptime: 91.4,
            coverage_radius: 450,
            connected_vehicles: 0,
            packets_sent: 812_733,
            packets_received: 798_021,
            last_heartbeat: now - Duration::minutes(22),
            firmware: "2.3.9".to_string(),
            ip_address: "10.20.1.13".to_string(),
        },
        Rsu {
            id: "RSU-004".to_string(),
            name: "FDR Drive Exit 6".to_string(),
            location: Coordinates {
                lat: 40.7180,
                lng: -73.9740,
            },
            address: "FDR Dr & Grand St".to_string(),
            status: RsuStatus::Online,
            uptime: 99.8,
            coverage_radius: 600,
            connected_vehicles: 58,
            packets_sent: 2_034_551,
            packets_received: 2_019_604,
            last_heartbeat: now - Duration::seconds(2),
            firmware: "2.4.1".to_string(),
            ip_address: "10.20.1.14".to_string(),
        },
    ]
}

/// Onboard units present at startup
pub fn seed_obus() -> Vec<Obu> {
    let now = Utc::now();
    vec![
        Obu {
            id: "OBU-1001".to_string(),
            vehicle_id: "VEH-1234".to_string(),
            vehicle_type: "Sedan".to_string(),
            status: ObuStatus::Active,
            location: Coordinates {
                lat: 40.7570,
                lng: -73.9860,
            },
            speed: 45,
            direction: 180,
            connected_rsu: Some("RSU-001".to_string()),
            signal_strength: 87,
            last_seen: now - Duration::seconds(3),
            firmware: "1.8.2".to_string(),
            battery_level: None,
        },
        Obu {
            id: "OBU-1002".to_string(),
            vehicle_id: "VEH-5678".to_string(),
            vehicle_type: "SUV".to_string(),
            status: ObuStatus::Active,
            location: Coordinates {
                lat: 40.7485,
                lng: -73.9690,
            },
            speed: 30,
            direction: 90,
            connected_rsu: Some("RSU-002".to_string()),
            signal_strength: 74,
            last_seen: now - Duration::seconds(6),
            firmware: "1.8.2".to_string(),
            battery_level: None,
        },
        Obu {
            id: "OBU-1003".to_string(),
            vehicle_id: "VEH-9012".to_string(),
            vehicle_type: "Motorcycle".to_string(),
            status: ObuStatus::Active,
            location: Coordinates {
                lat: 40.7200,
                lng: -73.9755,
            },
            speed: 62,
            direction: 310,
            connected_rsu: Some("RSU-004".to_string()),
            signal_strength: 91,
            last_seen: now - Duration::seconds(1),
            firmware: "1.9.0".to_string(),
            battery_level: Some(78),
        },
        Obu {
            id: "OBU-1004".to_string(),
            vehicle_id: "VEH-3456".to_string(),
            vehicle_type: "Truck".to_string(),
            status: ObuStatus::Inactive,
            location: Coordinates {
                lat: 40.7612,
                lng: -73.9784,
            },
            speed: 0,
            direction: 0,
            connected_rsu: None,
            signal_strength: 0,
            last_seen: now - Duration::hours(3),
            firmware: "1.7.5".to_string(),
            battery_level: Some(12),
        },
        Obu {
            id: "OBU-1005".to_string(),
            vehicle_id: "VEH-7890".to_string(),
            vehicle_type: "Sedan".to_string(),
            status: ObuStatus::Error,
            location: Coordinates {
                lat: 40.7435,
                lng: -73.9720,
            },
            speed: 18,
            direction: 45,
            connected_rsu: Some("RSU-002".to_string()),
            signal_strength: 23,
            last_seen: now - Duration::minutes(11),
            firmware: "1.8.2".to_string(),
            battery_level: Some(54),
        },
    ]
}

/// Historical incident records present at startup
pub fn seed_incident_logs() -> Vec<IncidentLog> {
    let now = Utc::now();
    vec![
        IncidentLog {
            id: "LOG-3401".to_string(),
            accident_id: "ACC-0987".to_string(),
            timestamp: now - Duration::hours(2),
            severity: SeverityLevel::Critical,
            location: Coordinates {
                lat: 40.7551,
                lng: -73.9840,
            },
            address: "7th Ave & W 44th St".to_string(),
            vehicle_id: "VEH-2211".to_string(),
            status: IncidentStatus::Resolved,
            response_time: Some(312),
            dispatched_units: vec!["EMS-12".to_string(), "FD-07".to_string()],
            notes: "Two-vehicle collision, both occupants transported".to_string(),
            confidence_score: 96,
        },
        IncidentLog {
            id: "LOG-3402".to_string(),
            accident_id: "ACC-0991".to_string(),
            timestamp: now - Duration::minutes(75),
            severity: SeverityLevel::Warning,
            location: Coordinates {
                lat: 40.7446,
                lng: -73.9708,
            },
            address: "Queens Midtown Tunnel Approach".to_string(),
            vehicle_id: "VEH-4410".to_string(),
            status: IncidentStatus::Verified,
            response_time: Some(428),
            dispatched_units: vec!["PD-31".to_string()],
            notes: "Rear-end collision, lane blocked".to_string(),
            confidence_score: 88,
        },
        IncidentLog {
            id: "LOG-3403".to_string(),
            accident_id: "ACC-0994".to_string(),
            timestamp: now - Duration::minutes(40),
            severity: SeverityLevel::Moderate,
            location: Coordinates {
                lat: 40.7189,
                lng: -73.9747,
            },
            address: "FDR Dr & Grand St".to_string(),
            vehicle_id: "VEH-9012".to_string(),
            status: IncidentStatus::Acknowledged,
            response_time: None,
            dispatched_units: vec![],
            notes: "Sideswipe reported by OBU, awaiting verification".to_string(),
            confidence_score: 64,
        },
        IncidentLog {
            id: "LOG-3404".to_string(),
            accident_id: "ACC-0996".to_string(),
            timestamp: now - Duration::minutes(12),
            severity: SeverityLevel::Critical,
            location: Coordinates {
                lat: 40.7660,
                lng: -73.9790,
            },
            address: "Central Park S & 7th Ave".to_string(),
            vehicle_id: "VEH-5523".to_string(),
            status: IncidentStatus::Pending,
            response_time: None,
            dispatched_units: vec![],
            notes: "High impact force reading, node RSU-003 offline for maintenance".to_string(),
            confidence_score: 71,
        },
    ]
}

/// Per-device configurations present at startup
pub fn seed_device_configs() -> Vec<DeviceConfig> {
    vec![
        DeviceConfig {
            device_id: "RSU-001".to_string(),
            device_type: DeviceType::Rsu,
            retry_interval: 2000,
            ttl: 30,
            broadcast_radius: 500,
            network_mode: NetworkMode::Dsrc,
            update_interval: 1000,
            enable_logging: true,
        },
        DeviceConfig {
            device_id: "RSU-002".to_string(),
            device_type: DeviceType::Rsu,
            retry_interval: 2000,
            ttl: 30,
            broadcast_radius: 400,
            network_mode: NetworkMode::Dsrc,
            update_interval: 1000,
            enable_logging: true,
        },
        DeviceConfig {
            device_id: "RSU-003".to_string(),
            device_type: DeviceType::Rsu,
            retry_interval: 3000,
            ttl: 45,
            broadcast_radius: 450,
            network_mode: NetworkMode::CV2x,
            update_interval: 2000,
            enable_logging: false,
        },
        DeviceConfig {
            device_id: "OBU-1001".to_string(),
            device_type: DeviceType::Obu,
            retry_interval: 1500,
            ttl: 15,
            broadcast_radius: 300,
            network_mode: NetworkMode::CV2x,
            update_interval: 500,
            enable_logging: true,
        },
        DeviceConfig {
            device_id: "OBU-1003".to_string(),
            device_type: DeviceType::Obu,
            retry_interval: 1500,
            ttl: 15,
            broadcast_radius: 250,
            network_mode: NetworkMode::LoRa,
            update_interval: 500,
            enable_logging: false,
        },
    ]
}
