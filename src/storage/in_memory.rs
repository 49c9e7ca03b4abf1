//! In-memory REST backend for testing and development
//!
//! Serves any resource path with conventional REST semantics over JSON
//! records kept in memory. Resources are created on first write, so no
//! registration is needed.

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

type Records = IndexMap<String, Value>;

#[derive(Debug, Clone)]
struct InjectedFailure {
    status: StatusCode,
    message: String,
}

#[derive(Default)]
struct BackendState {
    resources: RwLock<HashMap<String, Records>>,
    envelopes: HashMap<String, String>,
    required_fields: HashMap<String, Vec<String>>,
    bodyless_writes: HashSet<String>,
    token: Option<String>,
    list_requests: RwLock<HashMap<String, usize>>,
    next_failure: RwLock<Option<InjectedFailure>>,
}

/// In-memory REST backend
///
/// Cheap to clone; every clone shares the same records.
///
/// ```rust,ignore
/// let backend = InMemoryBackend::new()
///     .with_envelope("leads", "leads")
///     .require_token("secret");
/// backend.seed("leads", vec![json!({"id": "1", "name": "Acme Inc"})]);
///
/// let addr = backend.spawn().await?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<BackendState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn configure(mut self, f: impl FnOnce(&mut BackendState)) -> Self {
        match Arc::get_mut(&mut self.state) {
            Some(state) => f(state),
            None => tracing::warn!("backend already shared, configuration ignored"),
        }
        self
    }

    /// Wrap list responses for `resource` in `{"<key>": [...]}` and single
    /// items in `{"data": {...}}`
    pub fn with_envelope(self, resource: &str, key: &str) -> Self {
        self.configure(|state| {
            state
                .envelopes
                .insert(resource.to_string(), key.to_string());
        })
    }

    /// Reject creates for `resource` missing any of `fields` with 422
    pub fn with_required_fields(self, resource: &str, fields: &[&str]) -> Self {
        self.configure(|state| {
            state.required_fields.insert(
                resource.to_string(),
                fields.iter().map(ToString::to_string).collect(),
            );
        })
    }

    /// Answer successful creates and updates for `resource` with
    /// `204 No Content` instead of the stored record
    pub fn with_bodyless_writes(self, resource: &str) -> Self {
        self.configure(|state| {
            state.bodyless_writes.insert(resource.to_string());
        })
    }

    /// Answer 401 unless requests carry `Authorization: Bearer <token>`
    pub fn require_token(self, token: &str) -> Self {
        self.configure(|state| state.token = Some(token.to_string()))
    }

    /// Insert records as-is; records without an `id` get one
    pub fn seed(&self, resource: &str, records: Vec<Value>) {
        let mut resources = self.state.resources.write().unwrap_or_else(PoisonError::into_inner);
        let table = resources.entry(resource.to_string()).or_default();
        for mut record in records {
            let id = match record.get("id").and_then(render) {
                Some(id) => id,
                None => {
                    let id = Uuid::new_v4().to_string();
                    if let Value::Object(map) = &mut record {
                        map.insert("id".to_string(), Value::String(id.clone()));
                    }
                    id
                }
            };
            table.insert(id, record);
        }
    }

    /// Current records of `resource`, in insertion order
    pub fn items(&self, resource: &str) -> Vec<Value> {
        self.state
            .resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    /// How many list requests `resource` has served
    pub fn list_requests(&self, resource: &str) -> usize {
        self.state
            .list_requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource)
            .copied()
            .unwrap_or(0)
    }

    /// Make the next create, update or delete fail with `status`
    pub fn fail_next(&self, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        *self
            .state
            .next_failure
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(InjectedFailure {
            status,
            message: message.to_string(),
        });
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/{resource}", get(list_items).post(create_item))
            .route(
                "/{resource}/{id}",
                get(get_item)
                    .patch(patch_item)
                    .put(put_item)
                    .delete(delete_item),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on an ephemeral localhost port
    pub async fn spawn(&self) -> Result<SocketAddr> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = self.router();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "in-memory backend stopped");
            }
        });

        tracing::info!(%addr, "in-memory backend listening");
        Ok(addr)
    }
}

type Shared = Arc<BackendState>;

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ "message": message }))).into_response()
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl BackendState {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let Some(token) = &self.token else {
            return Ok(());
        };
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented == Some(token.as_str()) {
            Ok(())
        } else {
            Err(error(StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }

    fn take_failure(&self) -> Result<(), Response> {
        let failure = self
            .next_failure
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match failure {
            Some(f) => Err(error(f.status, f.message)),
            None => Ok(()),
        }
    }

    fn written(&self, resource: &str, status: StatusCode, item: Value) -> Response {
        if self.bodyless_writes.contains(resource) {
            StatusCode::NO_CONTENT.into_response()
        } else {
            (status, Json(self.wrap_one(resource, item))).into_response()
        }
    }

    fn wrap_one(&self, resource: &str, item: Value) -> Value {
        if self.envelopes.contains_key(resource) {
            json!({ "data": item })
        } else {
            item
        }
    }
}

async fn list_items(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }

    *state
        .list_requests
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(resource.clone())
        .or_default() += 1;

    let items: Vec<Value> = {
        let resources = state.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources
            .get(&resource)
            .map(|table| {
                table
                    .values()
                    .filter(|item| {
                        params
                            .iter()
                            .all(|(key, expected)| item.get(key).and_then(render).as_ref() == Some(expected))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    };

    let body = match state.envelopes.get(&resource) {
        Some(key) => {
            let total = items.len();
            let mut envelope = Map::new();
            envelope.insert(key.clone(), Value::Array(items));
            envelope.insert("total".to_string(), json!(total));
            Value::Object(envelope)
        }
        None => Value::Array(items),
    };
    Json(body).into_response()
}

async fn get_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }

    let item = state
        .resources
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&resource)
        .and_then(|table| table.get(&id).cloned());

    match item {
        Some(item) => Json(state.wrap_one(&resource, item)).into_response(),
        None => error(StatusCode::NOT_FOUND, format!("{resource} {id} not found")),
    }
}

async fn create_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers).and_then(|_| state.take_failure()) {
        return rejection;
    }

    let Value::Object(mut record) = body else {
        return error(StatusCode::BAD_REQUEST, "Request body must be a JSON object");
    };

    if let Some(required) = state.required_fields.get(&resource) {
        let missing = required.iter().find(|field| {
            record
                .get(field.as_str())
                .is_none_or(|v| v.is_null() || v.as_str().is_some_and(|s| s.trim().is_empty()))
        });
        if let Some(field) = missing {
            return error(StatusCode::UNPROCESSABLE_ENTITY, format!("{field} is required"));
        }
    }

    let id = Uuid::new_v4().to_string();
    let now = Value::String(Utc::now().to_rfc3339());
    record.insert("id".to_string(), Value::String(id.clone()));
    record.insert("createdAt".to_string(), now.clone());
    record.insert("updatedAt".to_string(), now);
    let item = Value::Object(record);

    state
        .resources
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(resource.clone())
        .or_default()
        .insert(id, item.clone());

    tracing::debug!(%resource, "record created");
    state.written(&resource, StatusCode::CREATED, item)
}

async fn patch_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    update_item(state, headers, resource, id, body, false)
}

async fn put_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    update_item(state, headers, resource, id, body, true)
}

fn update_item(
    state: Shared,
    headers: HeaderMap,
    resource: String,
    id: String,
    body: Value,
    replace: bool,
) -> Response {
    if let Err(rejection) = state.authorize(&headers).and_then(|_| state.take_failure()) {
        return rejection;
    }

    let Value::Object(changes) = body else {
        return error(StatusCode::BAD_REQUEST, "Request body must be a JSON object");
    };

    let updated = {
        let mut resources = state.resources.write().unwrap_or_else(PoisonError::into_inner);
        let Some(Value::Object(record)) = resources.get_mut(&resource).and_then(|t| t.get_mut(&id))
        else {
            return error(StatusCode::NOT_FOUND, format!("{resource} {id} not found"));
        };

        if replace {
            let kept: Map<String, Value> = record
                .iter()
                .filter(|(key, _)| matches!(key.as_str(), "id" | "createdAt"))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            *record = kept;
        }
        for (key, value) in changes {
            if key != "id" {
                record.insert(key, value);
            }
        }
        record.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));
        Value::Object(record.clone())
    };

    tracing::debug!(%resource, %id, replace, "record updated");
    state.written(&resource, StatusCode::OK, updated)
}

async fn delete_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers).and_then(|_| state.take_failure()) {
        return rejection;
    }

    let removed = state
        .resources
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .get_mut(&resource)
        .and_then(|table| table.shift_remove(&id));

    match removed {
        Some(_) => {
            tracing::debug!(%resource, %id, "record deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        None => error(StatusCode::NOT_FOUND, format!("{resource} {id} not found")),
    }
}
