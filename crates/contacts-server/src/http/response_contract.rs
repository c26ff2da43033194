// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestTrace;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contacts_api::error_mapping::map_error;
use contacts_api::ApiError;
use contacts_store::StoreError;
use serde_json::json;

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status =
        StatusCode::from_u16(map_error(&err).status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err }))).into_response()
}

/// Stamps the request id on `err` before rendering it.
pub(crate) fn traced_error_response(trace: &RequestTrace, err: ApiError) -> Response {
    api_error_response(err.with_request_id(trace.request_id.clone()))
}

pub(crate) fn store_error_response(trace: &RequestTrace, err: &StoreError) -> Response {
    tracing::error!(
        request_id = %trace.request_id,
        code = err.code.as_str(),
        "contact store operation failed: {}",
        err.message
    );
    traced_error_response(trace, ApiError::storage_unavailable(err.code.as_str()))
}
