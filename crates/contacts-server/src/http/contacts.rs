// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestTrace;
use crate::http::response_contract::{store_error_response, traced_error_response};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use contacts_api::ApiError;
use contacts_model::{ContactDraft, ContactId, ValidationError};

/// Decodes a create/replace body. Content type is not checked.
fn parse_draft(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<ContactDraft, ApiError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(state.api.max_body_bytes)
        } else {
            ApiError::invalid_body(&rejection.body_text())
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::invalid_body(&e.to_string()))
}

fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::invalid_path(&rejection.body_text()))
}

fn validation_error(err: &ValidationError) -> ApiError {
    ApiError::validation_failed(err.field_errors())
}

pub(crate) async fn list_contacts_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
) -> Response {
    match state.store.find_all().await {
        Ok(contacts) => Json(contacts).into_response(),
        Err(e) => store_error_response(&trace, &e),
    }
}

pub(crate) async fn get_contact_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(err) => return traced_error_response(&trace, err),
    };
    match state.store.find_by_id(&ContactId::new(id.clone())).await {
        Ok(Some(contact)) => Json(contact).into_response(),
        Ok(None) => traced_error_response(&trace, ApiError::contact_not_found(&id)),
        Err(e) => store_error_response(&trace, &e),
    }
}

pub(crate) async fn create_contact_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let draft = match parse_draft(&state, body) {
        Ok(draft) => draft,
        Err(err) => return traced_error_response(&trace, err),
    };
    let contact = match draft.into_contact(None) {
        Ok(contact) => contact,
        Err(e) => return traced_error_response(&trace, validation_error(&e)),
    };
    match state.store.save(contact).await {
        Ok(saved) => {
            tracing::info!(
                request_id = %trace.request_id,
                id = saved.id.as_ref().map_or("", ContactId::as_str),
                "contact created"
            );
            (StatusCode::CREATED, Json(saved)).into_response()
        }
        Err(e) => store_error_response(&trace, &e),
    }
}

/// Full replace: every mutable field comes from the body, omitted ones become null.
/// The body is validated before the id is looked up.
pub(crate) async fn replace_contact_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(err) => return traced_error_response(&trace, err),
    };
    let draft = match parse_draft(&state, body) {
        Ok(draft) => draft,
        Err(err) => return traced_error_response(&trace, err),
    };
    let contact_id = ContactId::new(id.clone());
    let replaced = match draft.into_contact(Some(contact_id.clone())) {
        Ok(replaced) => replaced,
        Err(e) => return traced_error_response(&trace, validation_error(&e)),
    };
    match state.store.exists_by_id(&contact_id).await {
        Ok(true) => {}
        Ok(false) => return traced_error_response(&trace, ApiError::contact_not_found(&id)),
        Err(e) => return store_error_response(&trace, &e),
    }
    match state.store.save(replaced).await {
        Ok(saved) => {
            tracing::info!(request_id = %trace.request_id, id = %id, "contact replaced");
            Json(saved).into_response()
        }
        Err(e) => store_error_response(&trace, &e),
    }
}

pub(crate) async fn delete_contact_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(err) => return traced_error_response(&trace, err),
    };
    let contact_id = ContactId::new(id.clone());
    match state.store.exists_by_id(&contact_id).await {
        Ok(true) => {}
        Ok(false) => return traced_error_response(&trace, ApiError::contact_not_found(&id)),
        Err(e) => return store_error_response(&trace, &e),
    }
    match state.store.delete_by_id(&contact_id).await {
        Ok(()) => {
            tracing::info!(request_id = %trace.request_id, id = %id, "contact deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => store_error_response(&trace, &e),
    }
}
