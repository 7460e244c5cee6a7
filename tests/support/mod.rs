#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use contact_manager::api::models::{Contact, NewContact};
use contact_manager::server::{AppContext, build_router};
use contact_manager::store::{ContactStore, MemoryStore, StoreError};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use uuid::Uuid;

/// Store whose every call fails as if the database were unreachable.
#[derive(Default)]
pub struct DownStore {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ContactStore for DownStore {
    fn backend_tag(&self) -> &'static str {
        "down"
    }

    async fn connect(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert(&self, _contact: NewContact) -> Result<Contact, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<Option<Contact>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

pub fn memory_router() -> Router {
    build_router(AppContext::new(Arc::new(MemoryStore::new())))
}

pub fn router_with(store: Arc<dyn ContactStore>) -> Router {
    build_router(AppContext::new(store))
}

pub async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = router
        .clone()
        .oneshot(req.body(body).expect("request"))
        .await
        .expect("router is infallible");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
