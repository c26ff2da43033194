// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use contacts_store::{ContactStore, MemoryContactStore, SqliteContactStore, StoreError};
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

mod config;
mod http;
mod middleware;
mod telemetry;

pub use config::{
    validate_startup_config_contract, ApiConfig, ServiceConfig, StoreConfig,
    CONFIG_SCHEMA_VERSION,
};

pub const CRATE_NAME: &str = "contacts-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub api: ApiConfig,
    pub ready: Arc<AtomicBool>,
    pub accepting_requests: Arc<AtomicBool>,
    pub(crate) metrics: Arc<telemetry::metrics::RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<dyn ContactStore>, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            ready: Arc::new(AtomicBool::new(true)),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(telemetry::metrics::RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Opens the backend named by `config`.
pub fn open_contact_store(config: &StoreConfig) -> Result<Arc<dyn ContactStore>, StoreError> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(MemoryContactStore::new())),
        StoreConfig::Sqlite { path } => Ok(Arc::new(SqliteContactStore::open(path)?)),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/contacts",
            get(http::contacts::list_contacts_handler).post(http::contacts::create_contact_handler),
        )
        .route(
            "/api/contacts/:id",
            get(http::contacts::get_contact_handler)
                .put(http::contacts::replace_contact_handler)
                .delete(http::contacts::delete_contact_handler),
        )
        .route("/api/version", get(http::ops::version_handler))
        .route("/api/openapi.json", get(http::ops::openapi_handler))
        .route("/healthz", get(http::ops::healthz_handler))
        .route("/readyz", get(http::ops::readyz_handler))
        .route("/metrics", get(http::ops::metrics_handler))
        .layer(from_fn_with_state(state.clone(), middleware::cors::cors_middleware))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
