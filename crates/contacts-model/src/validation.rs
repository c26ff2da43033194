// SPDX-License-Identifier: Apache-2.0

use crate::contact::ContactDraft;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// Optional leading `+`, a digit, then at least seven digits, spaces or hyphens.
pub const PHONE_PATTERN: &str = r"^[+]?[0-9][0-9\s-]{7,}$";

pub const EMAIL_LOCAL_MAX_LEN: usize = 64;
const EMAIL_DOMAIN_MAX_LEN: usize = 255;

pub const NAME_REQUIRED_MESSAGE: &str = "Name is required";
pub const SURNAME_REQUIRED_MESSAGE: &str = "Surname is required";
pub const PHONE_INVALID_MESSAGE: &str = "Phone number must be valid";
pub const EMAIL_INVALID_MESSAGE: &str = "Email address must be valid";

const EMAIL_LOCAL_PATTERN: &str = r"^[a-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+)*$";
const EMAIL_DOMAIN_LABEL_PATTERN: &str =
    r"^[a-z0-9\x{80}-\x{FFFF}](?:[a-z0-9\x{80}-\x{FFFF}-]{0,61}[a-z0-9\x{80}-\x{FFFF}])?$";
const EMAIL_IP_LITERAL_PATTERN: &str = r"^\[(?:(?:25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])(?:\.(?:25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])){3}|IPv6:[0-9a-f:.]+)\]$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Every field rule a draft broke, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.0
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

// The patterns below are constants; a compile failure is a programming error.
fn compile_ascii(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .unicode(false)
        .build()
        .expect("constant ascii pattern compiles")
}

fn compile_case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("constant email pattern compiles")
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_ascii(PHONE_PATTERN))
}

fn email_local_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_case_insensitive(EMAIL_LOCAL_PATTERN))
}

fn email_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_case_insensitive(EMAIL_DOMAIN_LABEL_PATTERN))
}

fn email_ip_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_case_insensitive(EMAIL_IP_LITERAL_PATTERN))
}

/// Blank means absent or made only of characters at or below U+0020, which
/// covers ASCII controls but not Unicode spaces such as U+00A0.
fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim_matches(|c: char| c <= ' ').is_empty())
}

#[must_use]
pub fn is_valid_phone_number(value: &str) -> bool {
    phone_regex().is_match(value)
}

/// Syntactic address check. The empty string counts as "no address".
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().count() > EMAIL_LOCAL_MAX_LEN {
        return false;
    }
    if !email_local_regex().is_match(local) {
        return false;
    }
    is_valid_email_domain(domain)
}

fn is_valid_email_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > EMAIL_DOMAIN_MAX_LEN {
        return false;
    }
    if domain.starts_with('[') {
        return email_ip_literal_regex().is_match(domain);
    }
    domain.split('.').all(|label| email_label_regex().is_match(label))
}

pub fn validate_draft(draft: &ContactDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if is_blank(draft.name.as_deref()) {
        errors.push(FieldError::new("name", NAME_REQUIRED_MESSAGE));
    }
    if is_blank(draft.surname.as_deref()) {
        errors.push(FieldError::new("surname", SURNAME_REQUIRED_MESSAGE));
    }
    if let Some(phone) = draft.phone_number.as_deref() {
        if !is_valid_phone_number(phone) {
            errors.push(FieldError::new("phoneNumber", PHONE_INVALID_MESSAGE));
        }
    }
    if let Some(email) = draft.email.as_deref() {
        if !is_valid_email(email) {
            errors.push(FieldError::new("email", EMAIL_INVALID_MESSAGE));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}
