pub mod app_config;
pub mod config;
pub mod version;

pub use app_config::{Environment, MagentoConfig};
pub use config::{load_config, load_config_from_env, DEFAULT_MAGENTO_VERSION, DEFAULT_STORE_ID};
pub use version::{supports_store_filter, InvalidVersion, MagentoVersion};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
