//! Error types for the backend client and the reconcilers.
//!
//! # Design
//! `ApiError` describes what went wrong with a single HTTP exchange and always
//! names the request (method and URL) so a failure can be diagnosed without
//! correlating logs. The status code of a non-2xx response is a numeric field;
//! "not found" is decided by comparing it to 404 and nothing else.
//!
//! `ReconcileError` wraps an `ApiError` with the lifecycle step and entity it
//! happened to.

use thiserror::Error;

use crate::http::HttpMethod;

pub type ApiResult<T> = Result<T, ApiError>;
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors raised by `ApiClient` and the CRUD services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS, timeout or I/O failure. Never retried.
    #[error("{method} {url}: transport failure: {message}")]
    Transport {
        method: HttpMethod,
        url: String,
        message: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("{method} {url} -> {status}: {body}")]
    Backend {
        method: HttpMethod,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not the JSON the operation expected.
    #[error("{method} {url}: malformed response body: {source}")]
    Decode {
        method: HttpMethod,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code of a backend rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Lifecycle step a `ReconcileError` happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::List => "list",
        }
    }
}

/// A failed reconciliation step, surfaced to the outer engine.
#[derive(Debug, Error)]
#[error("could not {} {target}: {source}", .action.as_str())]
pub struct ReconcileError {
    pub action: Action,
    /// Entity kind, followed by its id when one is known (`dev D1`).
    pub target: String,
    #[source]
    pub source: ApiError,
}

impl ReconcileError {
    pub fn new(action: Action, kind: &str, id: Option<&str>, source: ApiError) -> Self {
        let target = match id {
            Some(id) => format!("{kind} {id}"),
            None => kind.to_string(),
        };
        Self {
            action,
            target,
            source,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }
}
