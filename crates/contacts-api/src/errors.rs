// SPDX-License-Identifier: Apache-2.0

use contacts_model::FieldError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CONTACT_NOT_FOUND_MESSAGE: &str = "Contact not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidBody,
    InvalidPath,
    PayloadTooLarge,
    ContactNotFound,
    StorageUnavailable,
    NotReady,
    Internal,
}

pub const API_ERROR_CODES: [&str; 8] = [
    "ValidationFailed",
    "InvalidBody",
    "InvalidPath",
    "PayloadTooLarge",
    "ContactNotFound",
    "StorageUnavailable",
    "NotReady",
    "Internal",
];

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "ValidationFailed",
            Self::InvalidBody => "InvalidBody",
            Self::InvalidPath => "InvalidPath",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::ContactNotFound => "ContactNotFound",
            Self::StorageUnavailable => "StorageUnavailable",
            Self::NotReady => "NotReady",
            Self::Internal => "Internal",
        }
    }
}

/// Wire error body, sent as `{"error": ApiError}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Lists every failing field, in field order.
    #[must_use]
    pub fn validation_failed(field_errors: &[FieldError]) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({ "field_errors": field_errors }),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_body(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidBody,
            "request body is not a valid contact document",
            json!({ "reason": reason }),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_path(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidPath,
            "request path is not valid",
            json!({ "reason": reason }),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::new(
            ApiErrorCode::PayloadTooLarge,
            "request body too large",
            json!({ "limit_bytes": limit_bytes }),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn contact_not_found(id: &str) -> Self {
        Self::new(
            ApiErrorCode::ContactNotFound,
            CONTACT_NOT_FOUND_MESSAGE,
            json!({ "id": id }),
            "req-unknown",
        )
    }

    /// Store faults are not echoed to clients beyond their class.
    #[must_use]
    pub fn storage_unavailable(class: &str) -> Self {
        Self::new(
            ApiErrorCode::StorageUnavailable,
            "contact storage is unavailable",
            json!({ "class": class }),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn not_ready() -> Self {
        Self::new(
            ApiErrorCode::NotReady,
            "service not ready",
            json!({}),
            "req-unknown",
        )
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};
