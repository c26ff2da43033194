// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Contact entity, identifier and field rules.
//!
//! A [`ContactDraft`] is what clients send; it only becomes a [`Contact`]
//! after [`ContactDraft::into_contact`] has checked every field rule, so a
//! contact that reaches storage has always been validated.

mod contact;
mod validation;

pub use contact::{Contact, ContactDraft, ContactId};
pub use validation::{
    is_valid_email, is_valid_phone_number, validate_draft, FieldError, ValidationError,
    EMAIL_INVALID_MESSAGE, EMAIL_LOCAL_MAX_LEN, NAME_REQUIRED_MESSAGE, PHONE_INVALID_MESSAGE,
    PHONE_PATTERN, SURNAME_REQUIRED_MESSAGE,
};

pub const CRATE_NAME: &str = "contacts-model";
