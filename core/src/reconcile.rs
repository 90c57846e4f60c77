//! Lifecycle logic between declared entities and the backend.
//!
//! # Design
//! A `Reconciler` is what the outer declarative engine talks to. It converts a
//! declaration into a wire request, applies it, and reports the result in
//! declared form. It owns the two places where an HTTP 404 is not a failure:
//!
//! - `read` of a missing entity returns `Ok(None)`, meaning the entity was
//!   removed behind the engine's back and should be dropped from its state.
//! - `delete` of a missing entity succeeds, because the entity is gone either
//!   way.
//!
//! `update` never trusts the update response. It re-reads the entity and
//! reports that, so the declared state after a mutation is always what the
//! backend holds. A 404 on that read is returned as the backend's own error. If the follow-up read fails, the backend may already be
//! updated while the caller keeps its old state; the next `read` repairs it.
//!
//! Reconcilers hold no mutable state, so one instance can serve concurrent
//! calls for different ids. Ordering of calls for one id is the caller's job.

use tracing::info;

use crate::client::ApiClient;
use crate::codec;
use crate::error::{Action, ReconcileError, ReconcileResult};
use crate::service::{CrudService, Entity};
use crate::types::{
    Dev, DevDecl, DevOps, DevOpsDecl, DevOpsState, DevState, Engineer, EngineerDecl,
    EngineerState, Ops, OpsDecl, OpsState,
};

/// Ties a wire entity to its declaration and declared state.
pub trait Resource: Entity {
    type Decl;
    type State;

    fn encode(decl: &Self::Decl) -> Self;

    /// Declared state right after create: the backend's id and echoed scalar
    /// fields, with reference lists kept as declared.
    fn adopt(decl: &Self::Decl, created: Self) -> Self::State;

    /// Declared state of an entity as read from the backend.
    fn project(wire: Self) -> Self::State;
}

impl Resource for Engineer {
    type Decl = EngineerDecl;
    type State = EngineerState;

    fn encode(decl: &EngineerDecl) -> Self {
        codec::encode_engineer(decl)
    }

    fn adopt(_decl: &EngineerDecl, created: Self) -> EngineerState {
        codec::project_engineer(created)
    }

    fn project(wire: Self) -> EngineerState {
        codec::project_engineer(wire)
    }
}

impl Resource for Dev {
    type Decl = DevDecl;
    type State = DevState;

    fn encode(decl: &DevDecl) -> Self {
        codec::encode_dev(decl)
    }

    fn adopt(decl: &DevDecl, created: Self) -> DevState {
        DevState {
            id: created.id,
            name: created.name,
            engineers: decl.engineers.clone(),
        }
    }

    fn project(wire: Self) -> DevState {
        codec::project_dev(wire)
    }
}

impl Resource for Ops {
    type Decl = OpsDecl;
    type State = OpsState;

    fn encode(decl: &OpsDecl) -> Self {
        codec::encode_ops(decl)
    }

    fn adopt(decl: &OpsDecl, created: Self) -> OpsState {
        OpsState {
            id: created.id,
            name: created.name,
            engineers: decl.engineers.clone(),
        }
    }

    fn project(wire: Self) -> OpsState {
        codec::project_ops(wire)
    }
}

impl Resource for DevOps {
    type Decl = DevOpsDecl;
    type State = DevOpsState;

    fn encode(decl: &DevOpsDecl) -> Self {
        codec::encode_devops(decl)
    }

    fn adopt(decl: &DevOpsDecl, created: Self) -> DevOpsState {
        DevOpsState {
            id: created.id,
            dev: decl.dev.clone(),
            ops: decl.ops.clone(),
        }
    }

    fn project(wire: Self) -> DevOpsState {
        codec::project_devops(wire)
    }
}

pub struct Reconciler<R> {
    service: CrudService<R>,
}

impl<R> Clone for Reconciler<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<R> std::fmt::Debug for Reconciler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("service", &self.service)
            .finish()
    }
}

pub type EngineerReconciler = Reconciler<Engineer>;
pub type DevReconciler = Reconciler<Dev>;
pub type OpsReconciler = Reconciler<Ops>;
pub type DevOpsReconciler = Reconciler<DevOps>;

impl<R: Resource> Reconciler<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            service: CrudService::new(client),
        }
    }

    pub fn service(&self) -> &CrudService<R> {
        &self.service
    }

    /// Create the declared entity. Referenced ids must already exist; the
    /// backend decides whether they do.
    pub fn create(&self, decl: &R::Decl) -> ReconcileResult<R::State> {
        let created = self
            .service
            .create(&R::encode(decl))
            .map_err(|e| ReconcileError::new(Action::Create, R::KIND, None, e))?;
        Ok(R::adopt(decl, created))
    }

    /// Current declared state of `id`, or `None` if the backend no longer has
    /// it.
    pub fn read(&self, id: &str) -> ReconcileResult<Option<R::State>> {
        let found = self
            .service
            .get(id)
            .map_err(|e| ReconcileError::new(Action::Read, R::KIND, Some(id), e))?;
        match found {
            Some(wire) => Ok(Some(R::project(wire))),
            None => {
                info!(kind = R::KIND, %id, "entity no longer exists on the backend");
                Ok(None)
            }
        }
    }

    /// Apply `decl` to `id`, then report the entity as re-read afterwards.
    pub fn update(&self, id: &str, decl: &R::Decl) -> ReconcileResult<R::State> {
        self.service
            .update(id, &R::encode(decl))
            .map_err(|e| ReconcileError::new(Action::Update, R::KIND, Some(id), e))?;

        // A 404 here is a failure, not drift: the mutation cannot be confirmed.
        let read_back = |e| ReconcileError::new(Action::Read, R::KIND, Some(id), e);
        let wire: R = self
            .service
            .client()
            .execute(self.service.build_get(id))
            .and_then(|payload| payload.json())
            .map_err(read_back)?;
        Ok(R::project(wire))
    }

    /// Delete `id`. Deleting something already gone succeeds.
    pub fn delete(&self, id: &str) -> ReconcileResult<()> {
        match self.service.delete(id) {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                info!(kind = R::KIND, %id, "entity already absent, treating delete as done");
                Ok(())
            }
            Err(err) => Err(ReconcileError::new(Action::Delete, R::KIND, Some(id), err)),
        }
    }

    /// Every entity of this kind in declared form, for read-only discovery.
    pub fn list(&self) -> ReconcileResult<Vec<R::State>> {
        let all = self
            .service
            .list()
            .map_err(|e| ReconcileError::new(Action::List, R::KIND, None, e))?;
        Ok(all.into_iter().map(R::project).collect())
    }
}
