//! The network side of a request.
//!
//! # Design
//! `Transport` is the only place that does I/O. It performs exactly one round
//! trip and hands back whatever the backend said, including 4xx/5xx, as an
//! `HttpResponse`; status interpretation belongs to `ApiClient`. Only failures
//! to get any response at all are errors here. The body is read as bytes, so
//! an odd encoding never hides the status.

use ureq::Agent;

use crate::config::REQUEST_TIMEOUT;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP exchange. `request.path` is already an absolute URL.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> ApiResult<HttpResponse>;
}

/// Blocking transport on a shared `ureq::Agent`.
///
/// The agent applies `REQUEST_TIMEOUT` to every call and returns non-2xx
/// responses as data. Connection reuse is whatever ureq does by default.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &REQUEST_TIMEOUT)
            .finish()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        let url = request.path.as_str();
        let body = request.body.as_deref().unwrap_or_default().as_bytes();

        let result = match (request.method, request.body.is_some()) {
            (HttpMethod::Get, _) => self.agent.get(url).call(),
            (HttpMethod::Delete, _) => self.agent.delete(url).call(),
            (HttpMethod::Post, true) => self
                .agent
                .post(url)
                .content_type("application/json")
                .send(body),
            (HttpMethod::Post, false) => self.agent.post(url).send_empty(),
            (HttpMethod::Put, true) => self
                .agent
                .put(url)
                .content_type("application/json")
                .send(body),
            (HttpMethod::Put, false) => self.agent.put(url).send_empty(),
        };

        let failed = |e: ureq::Error| ApiError::Transport {
            method: request.method,
            url: request.path.clone(),
            message: e.to_string(),
        };

        let mut response = result.map_err(failed)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec().map_err(failed)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
