use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Event types supported by the system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    // Alert lifecycle events
    AlertRaised,
    AlertAcknowledged,
    AlertDispatched,
    AlertResolved,

    // Health and metrics events
    HealthUpdated,
    MetricsUpdated,

    // User management events
    UserCreated,
    UserRemoved,

    // Device events
    DeviceConfigUpdated,

    // System events
    SystemStartup,
    SystemShutdown,

    // Custom event
    Custom(String),
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlertRaised => write!(f, "alert.raised"),
            Self::AlertAcknowledged => write!(f, "alert.acknowledged"),
            Self::AlertDispatched => write!(f, "alert.dispatched"),
            Self::AlertResolved => write!(f, "alert.resolved"),
            Self::HealthUpdated => write!(f, "health.updated"),
            Self::MetricsUpdated => write!(f, "metrics.updated"),
            Self::UserCreated => write!(f, "user.created"),
            Self::UserRemoved => write!(f, "user.removed"),
            Self::DeviceConfigUpdated => write!(f, "device.config_updated"),
            Self::SystemStartup => write!(f, "system.startup"),
            Self::SystemShutdown => write!(f, "system.shutdown"),
            Self::Custom(name) => write!(f, "custom.{}", name),
        }
    }
}

/// Event message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    /// Unique event ID
    pub id: Uuid,
    /// Event type
    pub event_type: EventType,
    /// Event source ID (e.g., alert ID)
    pub source_id: Option<String>,
    /// Event timestamp
    pub timestamp: DateTime<Utc>,
    /// Event data payload
    pub payload: serde_json::Value,
}

impl EventMessage {
    /// Create a new event message
    pub fn new<T: Serialize>(
        event_type: EventType,
        source_id: Option<String>,
        payload: T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            event_type,
            source_id,
            timestamp: Utc::now(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Create a new event message with empty payload
    pub fn new_empty(event_type: EventType, source_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            source_id,
            timestamp: Utc::now(),
            payload: serde_json::Value::Null,
        }
    }

    /// Get the routing key for the event
    pub fn routing_key(&self) -> String {
        match &self.source_id {
            Some(id) => format!("{}.{}", self.event_type, id),
            None => self.event_type.to_string(),
        }
    }
}
