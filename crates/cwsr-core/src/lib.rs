//! Shared types and configuration for the store-reviews service.

pub mod app_config;
pub mod config;
pub mod product;
pub mod reviews;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use product::ProductIdentity;
pub use reviews::{Metrics, Review, ReviewSource, ReviewsPayload};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
