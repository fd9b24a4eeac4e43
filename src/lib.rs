pub mod alerts;
pub mod api;
pub mod config;
pub mod devices;
pub mod error;
pub mod geocoding;
pub mod incidents;
pub mod messaging;
pub mod security;
pub mod simulation;
pub mod storage;

pub use error::Error;

// Re-export main components for easier use
pub use alerts::AlertStore;
pub use simulation::{AlertFeed, AlertGenerator, HealthMonitor, MetricsSampler};
pub use storage::models::alert_models::{
    AccidentAlert, AlertStatus, InjuryLikelihood, SeverityLevel, SystemHealth,
};
pub use storage::LocalStore;
