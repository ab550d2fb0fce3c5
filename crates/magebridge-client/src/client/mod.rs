//! Typed access to the Magento catalog REST endpoints.

mod catalog;
mod products;
mod store;

use magebridge_core::MagentoConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::MagentoError;
use crate::transport::{HttpTransport, Transport};

/// Characters escaped in SKU and attribute-code path segments.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the Magento 2 catalog REST API.
///
/// Every operation issues at most one [`Transport::fetch`]. A non-2xx answer
/// surfaces as [`MagentoError::Api`] carrying the raw status and body, with
/// no normalization applied. Product searches return the query string they
/// sent alongside their results.
pub struct MagentoClient<T = HttpTransport> {
    transport: T,
}

impl MagentoClient<HttpTransport> {
    /// Builds a client over [`HttpTransport`] from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MagentoError::InvalidBaseUrl`] or [`MagentoError::Http`] if
    /// the transport cannot be built.
    pub fn from_config(config: &MagentoConfig) -> Result<Self, MagentoError> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }
}

impl<T: Transport> MagentoClient<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `path` and returns its body, or [`MagentoError::Api`] on a
    /// non-2xx status.
    async fn request(&self, path: &str) -> Result<Option<Value>, MagentoError> {
        let response = self.transport.fetch(path).await?;
        if !response.is_success() {
            tracing::warn!(path, status = response.status, "Magento request failed");
            return Err(MagentoError::Api {
                status: response.status,
                path: path.to_owned(),
                body: response.body,
            });
        }
        Ok(response.body)
    }

    /// Fetches `path` and decodes a required body as `D`.
    async fn get_json<D: DeserializeOwned>(&self, path: &str, context: &str) -> Result<D, MagentoError> {
        let body = self
            .request(path)
            .await?
            .ok_or_else(|| MagentoError::EmptyBody {
                path: path.to_owned(),
            })?;
        decode(body, context)
    }

    /// Fetches `path` and decodes a JSON array, treating a missing or `null`
    /// body as empty. Entries that do not decode are skipped with a warning.
    async fn get_list<D: DeserializeOwned>(&self, path: &str, context: &str) -> Result<Vec<D>, MagentoError> {
        match self.request(path).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(decode_each(items, context)),
            Some(other) => Err(MagentoError::Deserialize {
                context: context.to_owned(),
                source: <serde_json::Error as serde::de::Error>::custom(format!(
                    "expected a JSON array, got {}",
                    json_kind(&other)
                )),
            }),
        }
    }
}

fn decode<D: DeserializeOwned>(value: Value, context: &str) -> Result<D, MagentoError> {
    serde_json::from_value(value).map_err(|source| MagentoError::Deserialize {
        context: context.to_owned(),
        source,
    })
}

fn decode_each<D: DeserializeOwned>(items: Vec<Value>, context: &str) -> Vec<D> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(context, index, error = %e, "skipping malformed entry");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Percent-encodes a SKU or attribute code for use as one path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
