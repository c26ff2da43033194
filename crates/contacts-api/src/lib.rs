// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod error_mapping;
mod errors;
pub mod openapi;

pub use errors::{ApiError, ApiErrorCode, API_ERROR_CODES, CONTACT_NOT_FOUND_MESSAGE};

pub const CRATE_NAME: &str = "contacts-api";
pub const CONTACTS_BASE_PATH: &str = "/api/contacts";
