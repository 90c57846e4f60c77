//! Reconciliation of declared organisational entities against a REST backend.
//!
//! # Overview
//! Engineers, dev groups, ops groups and dev-ops pairings are declared by an
//! outer engine with references expressed as id lists. This crate creates,
//! reads, updates and deletes them on the backend and reports each result in
//! the same declared form, so the engine can diff declared and actual state.
//!
//! # Design
//! - `ApiClient` is built once from `ClientConfig` and shared by every
//!   service; the blocking `Transport` behind it is swappable for tests.
//! - `CrudService<E>` issues exactly one HTTP call per operation, with the
//!   per-entity URL shapes pinned by `Entity`.
//! - `Reconciler<R>` owns error classification: 404 on read means the entity
//!   drifted away, 404 on delete is success, and update is always followed by
//!   a read.
//! - No retries, no caching, no pre-flight checks on referenced ids.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod reconcile;
pub mod service;
pub mod transport;
pub mod types;

pub use client::{ApiClient, Payload};
pub use config::ClientConfig;
pub use error::{Action, ApiError, ApiResult, ReconcileError, ReconcileResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use provider::Provider;
pub use reconcile::{
    DevOpsReconciler, DevReconciler, EngineerReconciler, OpsReconciler, Reconciler, Resource,
};
pub use service::{CrudService, DevOpsService, DevService, EngineerService, Entity, OpsService};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Dev, DevDecl, DevOps, DevOpsDecl, DevOpsState, DevState, Engineer, EngineerDecl,
    EngineerState, Ops, OpsDecl, OpsState,
};
