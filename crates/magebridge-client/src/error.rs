use thiserror::Error;

#[derive(Debug, Error)]
pub enum MagentoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The transport answered with a non-success status. The raw status and
    /// body are carried through untouched; no normalization was applied.
    #[error("Magento returned HTTP {status} for {path}")]
    Api {
        status: u16,
        path: String,
        body: Option<serde_json::Value>,
    },

    #[error("empty response body from {path}")]
    EmptyBody { path: String },

    #[error("rate limited on {path} (retry after {retry_after_secs}s)")]
    RateLimited { path: String, retry_after_secs: u64 },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
