//! The HTTP collaborator behind [`crate::MagentoClient`].
//!
//! The client builds paths and query strings and interprets responses; a
//! [`Transport`] only moves bytes. Authentication, timeouts and retries all
//! live here so the client stays testable with an in-memory double.

use std::future::Future;
use std::time::Duration;

use magebridge_core::MagentoConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::MagentoError;
use crate::rate_limit::retry_with_backoff;

/// Status and decoded body of one REST call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// `None` when the response had no body.
    pub body: Option<Value>,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a `GET` against the store's REST root.
///
/// `path_and_query` is relative to the REST root (for example
/// `/V1/products?searchCriteria[pageSize]=20`) and already URL-encoded.
/// Implementations return non-2xx answers as a [`TransportResponse`] and
/// reserve `Err` for failures where no usable answer exists.
pub trait Transport: Send + Sync {
    fn fetch(
        &self,
        path_and_query: &str,
    ) -> impl Future<Output = Result<TransportResponse, MagentoError>> + Send;
}

/// `reqwest`-backed [`Transport`] with bearer auth and retry on 429 and
/// network errors.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpTransport {
    /// # Errors
    ///
    /// - [`MagentoError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   `http`/`https` URL or `access_token` is not a valid header value.
    /// - [`MagentoError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        access_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, MagentoError> {
        let invalid = |reason: String| MagentoError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        let parsed = Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| invalid("access token is not a valid header value".to_owned()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// Same as [`HttpTransport::new`].
    pub fn from_config(config: &MagentoConfig) -> Result<Self, MagentoError> {
        Self::new(
            &config.base_url,
            config.access_token.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Joins the REST root and a relative path, tolerating a missing
    /// leading slash.
    pub(crate) fn url_for(&self, path_and_query: &str) -> Result<Url, MagentoError> {
        let root = self.base_url.as_str().trim_end_matches('/');
        let rel = path_and_query.trim_start_matches('/');
        Url::parse(&format!("{root}/{rel}")).map_err(|e| MagentoError::InvalidBaseUrl {
            base_url: self.base_url.to_string(),
            reason: format!("cannot join {path_and_query}: {e}"),
        })
    }

    async fn fetch_once(&self, url: &Url, path: &str) -> Result<TransportResponse, MagentoError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(MagentoError::RateLimited {
                path: path.to_owned(),
                retry_after_secs,
            });
        }

        let bytes = response.bytes().await?;
        let body = decode_body(status, &bytes, path)?;
        tracing::debug!(path, status = status.as_u16(), "Magento response");
        Ok(TransportResponse::new(status.as_u16(), body))
    }
}

/// Empty bodies become `None`. A success body must be JSON; an error body
/// that is not JSON is kept as a string so callers can still show it.
fn decode_body(status: StatusCode, bytes: &[u8], path: &str) -> Result<Option<Value>, MagentoError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Ok(Some(value)),
        Err(_) if !status.is_success() => {
            Ok(Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
        }
        Err(source) => Err(MagentoError::Deserialize {
            context: format!("response body of {path}"),
            source,
        }),
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, path_and_query: &str) -> Result<TransportResponse, MagentoError> {
        let url = self.url_for(path_and_query)?;
        let url = &url;
        retry_with_backoff(self.max_retries, self.backoff_base_secs, move || {
            self.fetch_once(url, path_and_query)
        })
        .await
    }
}
