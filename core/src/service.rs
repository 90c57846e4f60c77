//! Per-entity CRUD services.
//!
//! # Design
//! Every entity type gets the same five operations; only the URL templates
//! differ, and those differ in ways the backend depends on (`/op` is singular,
//! engineers and dev groups are fetched under `/id/`). `Entity` pins the
//! templates per wire type and `CrudService<E>` does the rest.
//!
//! Each operation is split like the rest of the crate: a pure `build_*` that
//! produces an `HttpRequest`, and an executing method that sends it through the
//! shared `ApiClient` and decodes the answer. Every executing method issues
//! exactly one HTTP call.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{Dev, DevOps, Engineer, Ops};

/// A wire entity and the URL shapes of its collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Label used in logs and error messages.
    const KIND: &'static str;

    /// Collection path, used for list and create.
    fn collection() -> &'static str;

    fn by_id_path(id: &str) -> String;

    fn update_path(id: &str) -> String;

    fn delete_path(id: &str) -> String {
        format!("{}/{id}", Self::collection())
    }
}

impl Entity for Engineer {
    const KIND: &'static str = "engineer";

    fn collection() -> &'static str {
        "/engineers"
    }

    fn by_id_path(id: &str) -> String {
        format!("/engineers/id/{id}")
    }

    fn update_path(id: &str) -> String {
        format!("/engineers/id/{id}")
    }
}

impl Entity for Dev {
    const KIND: &'static str = "dev";

    fn collection() -> &'static str {
        "/dev"
    }

    fn by_id_path(id: &str) -> String {
        format!("/dev/id/{id}")
    }

    fn update_path(id: &str) -> String {
        format!("/dev/{id}")
    }
}

impl Entity for Ops {
    const KIND: &'static str = "ops";

    fn collection() -> &'static str {
        "/op"
    }

    fn by_id_path(id: &str) -> String {
        format!("/op/{id}")
    }

    fn update_path(id: &str) -> String {
        format!("/op/{id}")
    }
}

impl Entity for DevOps {
    const KIND: &'static str = "devops";

    fn collection() -> &'static str {
        "/devops"
    }

    fn by_id_path(id: &str) -> String {
        format!("/devops/{id}")
    }

    fn update_path(id: &str) -> String {
        format!("/devops/{id}")
    }
}

pub struct CrudService<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CrudService<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for CrudService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudService")
            .field("client", &self.client)
            .finish()
    }
}

pub type EngineerService = CrudService<Engineer>;
pub type DevService = CrudService<Dev>;
pub type OpsService = CrudService<Ops>;
pub type DevOpsService = CrudService<DevOps>;

impl<E: Entity> CrudService<E> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest::bare(HttpMethod::Get, E::collection().to_string())
    }

    pub fn build_get(&self, id: &str) -> HttpRequest {
        HttpRequest::bare(HttpMethod::Get, E::by_id_path(id))
    }

    pub fn build_create(&self, entity: &E) -> ApiResult<HttpRequest> {
        let body = serde_json::to_string(entity)?;
        Ok(HttpRequest::json(
            HttpMethod::Post,
            E::collection().to_string(),
            body,
        ))
    }

    pub fn build_update(&self, id: &str, entity: &E) -> ApiResult<HttpRequest> {
        let body = serde_json::to_string(entity)?;
        Ok(HttpRequest::json(HttpMethod::Put, E::update_path(id), body))
    }

    pub fn build_delete(&self, id: &str) -> HttpRequest {
        HttpRequest::bare(HttpMethod::Delete, E::delete_path(id))
    }

    /// Every entity in the collection, in backend order.
    pub fn list(&self) -> ApiResult<Vec<E>> {
        self.client.execute(self.build_list())?.json()
    }

    /// The entity with `id`, or `None` when the backend answers 404.
    pub fn get(&self, id: &str) -> ApiResult<Option<E>> {
        match self.client.execute(self.build_get(id)) {
            Ok(payload) => payload.json().map(Some),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Create `entity`; the result carries the backend-assigned id.
    pub fn create(&self, entity: &E) -> ApiResult<E> {
        self.client.execute(self.build_create(entity)?)?.json()
    }

    /// Replace the entity with `id`. The response may be partial.
    pub fn update(&self, id: &str, entity: &E) -> ApiResult<E> {
        self.client.execute(self.build_update(id, entity)?)?.json()
    }

    /// Delete the entity with `id`. A 404 is returned as an error here.
    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.execute(self.build_delete(id)).map(|_| ())
    }
}
