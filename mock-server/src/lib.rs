//! In-memory stand-in for the organisation backend.
//!
//! Serves the same routes, status codes and payload shapes the reconcilers
//! expect: nested engineers inside groups, nested groups inside pairings,
//! 404 for unknown ids and 400 for references to entities that do not exist.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engineer {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A dev or ops group as served, engineers resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub engineers: Vec<Engineer>,
}

/// A pairing as served, groups resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevOps {
    pub id: String,
    pub dev: Vec<Group>,
    pub ops: Vec<Group>,
}

#[derive(Deserialize)]
pub struct EngineerInput {
    pub name: String,
    pub email: String,
}

/// Only the `id` of an embedded object is read; anything else is ignored.
#[derive(Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Deserialize)]
pub struct GroupInput {
    pub name: String,
    #[serde(default)]
    pub engineers: Vec<IdRef>,
}

#[derive(Deserialize)]
pub struct DevOpsInput {
    #[serde(default)]
    pub dev: Vec<IdRef>,
    #[serde(default)]
    pub ops: Vec<IdRef>,
}

#[derive(Clone, Debug)]
struct StoredGroup {
    name: String,
    engineers: Vec<String>,
}

#[derive(Clone, Debug)]
struct StoredDevOps {
    dev: Vec<String>,
    ops: Vec<String>,
}

#[derive(Default)]
pub struct Store {
    engineers: HashMap<String, Engineer>,
    devs: HashMap<String, StoredGroup>,
    ops: HashMap<String, StoredGroup>,
    devops: HashMap<String, StoredDevOps>,
}

impl Store {
    /// Engineers that still exist, in stored order.
    fn resolve_group(&self, id: &str, group: &StoredGroup) -> Group {
        Group {
            id: id.to_string(),
            name: group.name.clone(),
            engineers: group
                .engineers
                .iter()
                .filter_map(|e| self.engineers.get(e).cloned())
                .collect(),
        }
    }

    fn resolve_devops(&self, id: &str, pairing: &StoredDevOps) -> DevOps {
        let groups = |ids: &[String], table: &HashMap<String, StoredGroup>| -> Vec<Group> {
            ids.iter()
                .filter_map(|g| table.get(g).map(|stored| self.resolve_group(g, stored)))
                .collect()
        };
        DevOps {
            id: id.to_string(),
            dev: groups(&pairing.dev, &self.devs),
            ops: groups(&pairing.ops, &self.ops),
        }
    }

    fn check_engineers(&self, refs: &[IdRef]) -> Result<Vec<String>, Rejection> {
        refs.iter()
            .map(|r| {
                if self.engineers.contains_key(&r.id) {
                    Ok(r.id.clone())
                } else {
                    Err(bad_request(format!("engineer {} does not exist", r.id)))
                }
            })
            .collect()
    }

    fn check_devops(&self, input: &DevOpsInput) -> Result<StoredDevOps, Rejection> {
        if input.dev.is_empty() || input.ops.is_empty() {
            return Err(bad_request(
                "a devops pairing needs at least one dev and one ops group".to_string(),
            ));
        }
        let check = |refs: &[IdRef], table: &HashMap<String, StoredGroup>, kind: &str| {
            refs.iter()
                .map(|r| {
                    if table.contains_key(&r.id) {
                        Ok(r.id.clone())
                    } else {
                        Err(bad_request(format!("{kind} group {} does not exist", r.id)))
                    }
                })
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(StoredDevOps {
            dev: check(&input.dev, &self.devs, "dev")?,
            ops: check(&input.ops, &self.ops, "ops")?,
        })
    }
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, String);

fn bad_request(message: String) -> Rejection {
    (StatusCode::BAD_REQUEST, message)
}

fn not_found(kind: &str, id: &str) -> Rejection {
    (StatusCode::NOT_FOUND, format!("{kind} {id} not found"))
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/engineers", get(list_engineers).post(create_engineer))
        .route("/engineers/id/{id}", get(get_engineer).put(update_engineer))
        .route("/engineers/{id}", delete(delete_engineer))
        .route("/dev", get(list_devs).post(create_dev))
        .route("/dev/id/{id}", get(get_dev))
        .route("/dev/{id}", put(update_dev).delete(delete_dev))
        .route("/op", get(list_ops).post(create_ops))
        .route("/op/{id}", get(get_ops).put(update_ops).delete(delete_ops))
        .route("/devops", get(list_devops).post(create_devops))
        .route(
            "/devops/{id}",
            get(get_devops).put(update_devops).delete(delete_devops),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- engineers ---

async fn list_engineers(State(db): State<Db>) -> Json<Vec<Engineer>> {
    let store = db.read().await;
    Json(store.engineers.values().cloned().collect())
}

async fn create_engineer(
    State(db): State<Db>,
    Json(input): Json<EngineerInput>,
) -> (StatusCode, Json<Engineer>) {
    let engineer = Engineer {
        id: new_id(),
        name: input.name,
        email: input.email,
    };
    db.write()
        .await
        .engineers
        .insert(engineer.id.clone(), engineer.clone());
    (StatusCode::CREATED, Json(engineer))
}

async fn get_engineer(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Engineer>, Rejection> {
    let store = db.read().await;
    store
        .engineers
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("engineer", &id))
}

async fn update_engineer(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<EngineerInput>,
) -> Result<Json<Engineer>, Rejection> {
    let mut store = db.write().await;
    let engineer = store
        .engineers
        .get_mut(&id)
        .ok_or_else(|| not_found("engineer", &id))?;
    engineer.name = input.name;
    engineer.email = input.email;
    Ok(Json(engineer.clone()))
}

async fn delete_engineer(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    store
        .engineers
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("engineer", &id))
}

// --- dev and ops groups ---

#[derive(Clone, Copy)]
enum GroupKind {
    Dev,
    Ops,
}

impl GroupKind {
    fn label(self) -> &'static str {
        match self {
            GroupKind::Dev => "dev group",
            GroupKind::Ops => "ops group",
        }
    }

    fn table(self, store: &Store) -> &HashMap<String, StoredGroup> {
        match self {
            GroupKind::Dev => &store.devs,
            GroupKind::Ops => &store.ops,
        }
    }

    fn table_mut(self, store: &mut Store) -> &mut HashMap<String, StoredGroup> {
        match self {
            GroupKind::Dev => &mut store.devs,
            GroupKind::Ops => &mut store.ops,
        }
    }
}

async fn list_groups(db: Db, kind: GroupKind) -> Json<Vec<Group>> {
    let store = db.read().await;
    Json(
        kind.table(&store)
            .iter()
            .map(|(id, g)| store.resolve_group(id, g))
            .collect(),
    )
}

async fn create_group(
    db: Db,
    kind: GroupKind,
    input: GroupInput,
) -> Result<(StatusCode, Json<Group>), Rejection> {
    let mut store = db.write().await;
    let engineers = store.check_engineers(&input.engineers)?;
    let id = new_id();
    let stored = StoredGroup {
        name: input.name,
        engineers,
    };
    let group = store.resolve_group(&id, &stored);
    kind.table_mut(&mut store).insert(id, stored);
    Ok((StatusCode::CREATED, Json(group)))
}

async fn get_group(db: Db, kind: GroupKind, id: String) -> Result<Json<Group>, Rejection> {
    let store = db.read().await;
    kind.table(&store)
        .get(&id)
        .map(|g| Json(store.resolve_group(&id, g)))
        .ok_or_else(|| not_found(kind.label(), &id))
}

async fn update_group(
    db: Db,
    kind: GroupKind,
    id: String,
    input: GroupInput,
) -> Result<Json<Group>, Rejection> {
    let mut store = db.write().await;
    if !kind.table(&store).contains_key(&id) {
        return Err(not_found(kind.label(), &id));
    }
    let engineers = store.check_engineers(&input.engineers)?;
    let stored = StoredGroup {
        name: input.name,
        engineers,
    };
    let group = store.resolve_group(&id, &stored);
    kind.table_mut(&mut store).insert(id, stored);
    Ok(Json(group))
}

async fn delete_group(db: Db, kind: GroupKind, id: String) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    kind.table_mut(&mut store)
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(kind.label(), &id))
}

async fn list_devs(State(db): State<Db>) -> Json<Vec<Group>> {
    list_groups(db, GroupKind::Dev).await
}

async fn create_dev(
    State(db): State<Db>,
    Json(input): Json<GroupInput>,
) -> Result<(StatusCode, Json<Group>), Rejection> {
    create_group(db, GroupKind::Dev, input).await
}

async fn get_dev(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Group>, Rejection> {
    get_group(db, GroupKind::Dev, id).await
}

async fn update_dev(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<GroupInput>,
) -> Result<Json<Group>, Rejection> {
    update_group(db, GroupKind::Dev, id, input).await
}

async fn delete_dev(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    delete_group(db, GroupKind::Dev, id).await
}

async fn list_ops(State(db): State<Db>) -> Json<Vec<Group>> {
    list_groups(db, GroupKind::Ops).await
}

async fn create_ops(
    State(db): State<Db>,
    Json(input): Json<GroupInput>,
) -> Result<(StatusCode, Json<Group>), Rejection> {
    create_group(db, GroupKind::Ops, input).await
}

async fn get_ops(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Group>, Rejection> {
    get_group(db, GroupKind::Ops, id).await
}

async fn update_ops(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<GroupInput>,
) -> Result<Json<Group>, Rejection> {
    update_group(db, GroupKind::Ops, id, input).await
}

async fn delete_ops(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    delete_group(db, GroupKind::Ops, id).await
}

// --- devops pairings ---

async fn list_devops(State(db): State<Db>) -> Json<Vec<DevOps>> {
    let store = db.read().await;
    Json(
        store
            .devops
            .iter()
            .map(|(id, p)| store.resolve_devops(id, p))
            .collect(),
    )
}

async fn create_devops(
    State(db): State<Db>,
    Json(input): Json<DevOpsInput>,
) -> Result<(StatusCode, Json<DevOps>), Rejection> {
    let mut store = db.write().await;
    let stored = store.check_devops(&input)?;
    let id = new_id();
    let pairing = store.resolve_devops(&id, &stored);
    store.devops.insert(id, stored);
    Ok((StatusCode::CREATED, Json(pairing)))
}

async fn get_devops(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<DevOps>, Rejection> {
    let store = db.read().await;
    store
        .devops
        .get(&id)
        .map(|p| Json(store.resolve_devops(&id, p)))
        .ok_or_else(|| not_found("devops", &id))
}

/// Updates echo only the id; clients have to read the pairing back.
async fn update_devops(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<DevOpsInput>,
) -> Result<Json<serde_json::Value>, Rejection> {
    let mut store = db.write().await;
    if !store.devops.contains_key(&id) {
        return Err(not_found("devops", &id));
    }
    let stored = store.check_devops(&input)?;
    store.devops.insert(id.clone(), stored);
    Ok(Json(serde_json::json!({ "id": id })))
}

async fn delete_devops(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    store
        .devops
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("devops", &id))
}
