// SPDX-License-Identifier: Apache-2.0

use crate::config::CORS_ANY_ORIGIN;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub(crate) const CORS_ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
pub(crate) const CORS_ALLOW_HEADERS: &str = "content-type,x-request-id,x-correlation-id";

fn origin_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 256)
        .map(ToString::to_string)
}

/// The `access-control-allow-origin` value for this request, if any.
fn allowed_origin(state: &AppState, origin: Option<&str>) -> Option<HeaderValue> {
    if state.api.allows_any_origin() {
        return Some(HeaderValue::from_static(CORS_ANY_ORIGIN));
    }
    origin
        .filter(|o| state.api.allows_origin(o))
        .and_then(|o| HeaderValue::from_str(o).ok())
}

pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = origin_header(req.headers());
    let allow = allowed_origin(&state, origin.as_deref());

    let mut resp = if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if allow.is_some() {
            let headers = resp.headers_mut();
            headers.insert(
                "access-control-allow-methods",
                HeaderValue::from_static(CORS_ALLOW_METHODS),
            );
            headers.insert(
                "access-control-allow-headers",
                HeaderValue::from_static(CORS_ALLOW_HEADERS),
            );
            headers.insert("access-control-max-age", HeaderValue::from_static("600"));
        }
        resp
    } else {
        next.run(req).await
    };

    if let Some(value) = allow {
        let headers = resp.headers_mut();
        headers.insert("access-control-allow-origin", value);
        headers.insert(
            "access-control-expose-headers",
            HeaderValue::from_static("x-request-id"),
        );
        if !state.api.allows_any_origin() {
            headers.append("vary", HeaderValue::from_static("origin"));
        }
    }
    resp
}
