//! Remote component registry client.
//!
//! The registry exposes two endpoints:
//!
//! ```text
//! GET {registry}/components          -> {"components": [descriptor, ...]}
//! GET {registry}/components/{name}   -> descriptor
//! ```
//!
//! [`RegistryClient::fetch_component`] tries the per-item endpoint first and,
//! on any failure (network, 404, schema), falls back to the catalog with a
//! case-insensitive scan. Registries that only publish the catalog therefore
//! still work, at the cost of one extra request.
//!
//! Every request is bounded by a fixed timeout enforced by cancelling the
//! request future. Nothing is retried.

pub mod types;

pub use types::{
    Catalog, ComponentMeta, DesignGuide, Intelligence, MAX_COGNITIVE_LOAD, RegistryFile,
    RegistryItemKind, RemoteComponentDescriptor, RemoteTheme, UsagePatterns,
};

use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::constants::{REGISTRY_TIMEOUT, USER_AGENT as RAFTERS_USER_AGENT};
use crate::core::RaftersError;

/// HTTP client for a single registry base URL.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl RegistryClient {
    /// Create a client for `base_url` with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            timeout: REGISTRY_TIMEOUT,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// The registry base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retrieve the full catalog from `{base}/components`.
    ///
    /// Accepts `{"components": [...]}`, `{"items": [...]}` or a bare array and
    /// normalizes all of them to a [`Catalog`].
    pub async fn fetch_catalog(&self) -> Result<Catalog, RaftersError> {
        let url = self.endpoint(&["components"])?;
        let value = self.get_json(&url).await?;
        let catalog = normalize_catalog(&url, value)?;
        debug!("Fetched catalog with {} components from {}", catalog.components.len(), url);
        Ok(catalog)
    }

    /// Resolve a single component by name.
    ///
    /// The per-item endpoint is tried first; any failure there falls back to
    /// the catalog. Returns [`RaftersError::ComponentNotFound`] (carrying the
    /// catalog's names) when neither path matches. Errors from the catalog
    /// request itself are returned unchanged.
    pub async fn fetch_component(
        &self,
        name: &str,
    ) -> Result<RemoteComponentDescriptor, RaftersError> {
        match self.fetch_component_direct(name).await {
            Ok(descriptor) => return Ok(descriptor),
            Err(e) => {
                debug!("Direct lookup of '{}' failed ({}); scanning catalog", name, e);
            }
        }

        let catalog = self.fetch_catalog().await?;
        match catalog.find(name) {
            Some(descriptor) => Ok(descriptor.clone()),
            None => Err(RaftersError::ComponentNotFound {
                name: name.to_string(),
                available: catalog.names(),
            }),
        }
    }

    /// Fetch a token theme by identifier from `{base}/themes/{id}`.
    pub async fn fetch_theme(&self, id: &str) -> Result<RemoteTheme, RaftersError> {
        let url = self.endpoint(&["themes", id])?;
        let value = self.get_json(&url).await?;
        serde_json::from_value(value).map_err(|e| RaftersError::RegistrySchemaError {
            url,
            reason: e.to_string(),
        })
    }

    async fn fetch_component_direct(
        &self,
        name: &str,
    ) -> Result<RemoteComponentDescriptor, RaftersError> {
        let url = self.endpoint(&["components", name])?;
        let value = self.get_json(&url).await?;
        serde_json::from_value(value).map_err(|e| RaftersError::RegistrySchemaError {
            url,
            reason: e.to_string(),
        })
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<String, RaftersError> {
        let invalid = |reason: &str| RaftersError::RegistryUnreachable {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };

        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| invalid(&format!("invalid registry URL: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| invalid("registry URL cannot have path segments"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url.to_string())
    }

    async fn get_json(&self, url: &str) -> Result<Value, RaftersError> {
        debug!("GET {}", url);

        let request = async {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, RAFTERS_USER_AGENT)
                .send()
                .await
                .map_err(|e| RaftersError::RegistryUnreachable {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(RaftersError::RegistryHttpError {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response.text().await.map_err(|e| RaftersError::RegistryUnreachable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

            serde_json::from_str::<Value>(&body).map_err(|e| RaftersError::RegistrySchemaError {
                url: url.to_string(),
                reason: format!("response is not valid JSON: {e}"),
            })
        };

        if let Ok(result) = timeout(self.timeout, request).await {
            result
        } else {
            warn!("Registry request timed out after {:?}: {}", self.timeout, url);
            Err(RaftersError::RegistryTimeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            })
        }
    }
}

fn normalize_catalog(url: &str, value: Value) -> Result<Catalog, RaftersError> {
    let schema = |reason: String| RaftersError::RegistrySchemaError {
        url: url.to_string(),
        reason,
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            match map.remove("components").or_else(|| map.remove("items")) {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(schema("`components` is not an array".to_string())),
                None => return Err(schema("missing `components` array".to_string())),
            }
        }
        _ => return Err(schema("expected an object or an array".to_string())),
    };

    let components = items
        .into_iter()
        .map(serde_json::from_value::<RemoteComponentDescriptor>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| schema(format!("invalid component entry: {e}")))?;

    Ok(Catalog {
        components,
    })
}
