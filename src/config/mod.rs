use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub simulation: SimulationConfig,
    pub geocoding: GeocodingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API server address
    pub address: String,
    /// API server port
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Local key-value store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the JSON file backing the store
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/vanet-command.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// JWT secret key
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// JWT token expiration time in minutes
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_minutes: u64,
    /// Password hashing cost (higher is more secure but slower)
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
    /// Email of the administrator seeded when the user set is empty
    #[serde(default = "default_admin_email")]
    pub default_admin_email: String,
    /// Password of the seeded administrator
    #[serde(default = "default_admin_password")]
    pub default_admin_password: String,
}

fn default_jwt_secret() -> String {
    "default_secret_change_in_production".to_string()
}

fn default_jwt_expiration() -> u64 {
    60 // 60 minutes
}

fn default_password_hash_cost() -> u32 {
    10 // reasonable default for bcrypt
}

fn default_admin_email() -> String {
    "admin@v2x.com".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expiration_minutes: default_jwt_expiration(),
            password_hash_cost: default_password_hash_cost(),
            default_admin_email: default_admin_email(),
            default_admin_password: default_admin_password(),
        }
    }
}

/// Simulated world configuration.
///
/// Defaults match the main dashboard feed (10 s tick, 20% spawn chance,
/// unbounded store). A live-map style feed is the same task configured with
/// a 15 s tick, 0.3 spawn probability and `max_alerts = 20`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Seconds between alert feed ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// Probability that a tick spawns a new alert
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,
    /// Cap on retained alerts; oldest entries are truncated when set
    #[serde(default)]
    pub max_alerts: Option<usize>,
    /// Seconds between network metrics samples
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval_secs: u64,
}

fn default_tick_interval() -> u64 {
    10
}

fn default_spawn_probability() -> f64 {
    0.2
}

fn default_metrics_interval() -> u64 {
    5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
            spawn_probability: default_spawn_probability(),
            max_alerts: None,
            metrics_interval_secs: default_metrics_interval(),
        }
    }
}

/// Reverse geocoding and map tile configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocodingConfig {
    /// Nominatim reverse lookup endpoint
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    /// Slippy-map tile URL template
    #[serde(default = "default_tile_template")]
    pub tile_template: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
    /// Default tile zoom level
    #[serde(default = "default_tile_zoom")]
    pub tile_zoom: u8,
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_tile_template() -> String {
    "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_geocoding_timeout() -> u64 {
    10
}

fn default_tile_zoom() -> u8 {
    13
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            tile_template: default_tile_template(),
            timeout_secs: default_geocoding_timeout(),
            tile_zoom: default_tile_zoom(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                address: "0.0.0.0".to_string(),
                port: 4750,
                log_level: "info".to_string(),
            },
            storage: StorageConfig::default(),
            security: SecurityConfig::default(),
            simulation: SimulationConfig::default(),
            geocoding: GeocodingConfig::default(),
        }
    }
}

/// Load configuration from a file or use default
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .context(format!("Failed to read config file: {:?}", path))?;

            let config = if path.extension().map_or(false, |ext| ext == "json") {
                serde_json::from_str(&config_str).context("Failed to parse JSON config")?
            } else if path.extension().map_or(false, |ext| ext == "toml") {
                toml::from_str(&config_str).context("Failed to parse TOML config")?
            } else {
                return Err(anyhow::anyhow!("Unsupported config file format"));
            };

            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
