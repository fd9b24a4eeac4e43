pub mod feed;
pub mod generator;
pub mod health;
pub mod metrics;
pub mod seed;

pub use feed::AlertFeed;
pub use generator::AlertGenerator;
pub use health::HealthMonitor;
pub use metrics::MetricsSampler;
