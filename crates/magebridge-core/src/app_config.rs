use crate::version::MagentoVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Connection and transport settings for one Magento storefront.
#[derive(Clone)]
pub struct MagentoConfig {
    /// REST root, e.g. `https://shop.example.com/rest/default`.
    pub base_url: String,
    /// Integration bearer token. Public catalogs can be read without one.
    pub access_token: Option<String>,
    pub magento_version: MagentoVersion,
    pub store_id: u32,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for MagentoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagentoConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("magento_version", &self.magento_version)
            .field("store_id", &self.store_id)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .finish()
    }
}
