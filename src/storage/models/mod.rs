pub mod alert_models;
pub mod user_models;
pub mod v2x_models;
