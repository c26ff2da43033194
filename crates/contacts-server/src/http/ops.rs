// SPDX-License-Identifier: Apache-2.0

use crate::config::CONFIG_SCHEMA_VERSION;
use crate::http::request_tracing::RequestTrace;
use crate::http::response_contract::traced_error_response;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use contacts_api::openapi::{openapi_spec, OPENAPI_VERSION};
use contacts_api::ApiError;
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn readyz_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
) -> Response {
    if state.ready.load(Ordering::Relaxed) && state.accepting_requests.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready").into_response()
    } else {
        traced_error_response(&trace, ApiError::not_ready())
    }
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.render(state.store.backend_tag()).await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": {
            "name": crate::CRATE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "api": {
            "version": OPENAPI_VERSION,
            "base_path": contacts_api::CONTACTS_BASE_PATH,
        },
        "config_schema_version": CONFIG_SCHEMA_VERSION,
        "store": state.store.backend_tag(),
    }))
}

pub(crate) async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_spec())
}
