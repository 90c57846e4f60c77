//! Shared backend client.
//!
//! # Design
//! `ApiClient` holds the resolved base URL and a transport behind an `Arc`.
//! It is built once and cloned into every entity service; nothing mutates it
//! after construction, so concurrent use across entities needs no locking.
//!
//! `execute` owns status interpretation: 2xx yields a `Payload`, anything else
//! becomes `ApiError::Backend` with the status and the body as (lossy) text.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{Transport, UreqTransport};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client over the default blocking HTTP transport.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new()))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a request path against the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send one request and return the body of a 2xx response.
    pub fn execute(&self, request: HttpRequest) -> ApiResult<Payload> {
        let method = request.method;
        let url = self.url(&request.path);
        debug!(%method, %url, "sending request");

        let resolved = HttpRequest {
            path: url.clone(),
            ..request
        };
        let response = self.transport.send(&resolved)?;

        if !response.is_success() {
            let body = response.text().into_owned();
            warn!(
                %method,
                %url,
                status = response.status,
                %body,
                "backend rejected request"
            );
            return Err(ApiError::Backend {
                method,
                url,
                status: response.status,
                body,
            });
        }

        debug!(%method, %url, status = response.status, "request succeeded");
        Ok(Payload {
            method,
            url,
            body: response.body,
        })
    }
}

/// Body of a successful response, still tagged with the request it answers.
#[derive(Debug, Clone)]
pub struct Payload {
    pub method: HttpMethod,
    pub url: String,
    pub body: Vec<u8>,
}

impl Payload {
    /// Decode the body. A malformed body, including one that is not UTF-8, is
    /// an error, never a default value.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|source| ApiError::Decode {
            method: self.method,
            url: self.url.clone(),
            source,
        })
    }
}
