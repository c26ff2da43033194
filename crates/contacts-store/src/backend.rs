// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use contacts_model::{Contact, ContactId};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    Io,
    Codec,
    Unavailable,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io_error",
            Self::Codec => "codec_error",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Access to the `contacts` collection.
///
/// Implementations add no business rules: each method is a single collection
/// operation, atomic per document.
#[async_trait]
pub trait ContactStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str {
        "unknown"
    }

    /// Every stored contact, in insertion order. Empty when none exist.
    async fn find_all(&self) -> Result<Vec<Contact>, StoreError>;

    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, StoreError>;

    async fn exists_by_id(&self, id: &ContactId) -> Result<bool, StoreError>;

    /// Inserts under a fresh id when `contact.id` is unset, otherwise replaces
    /// the whole document stored under that id (inserting it if absent).
    async fn save(&self, contact: Contact) -> Result<Contact, StoreError>;

    /// Removes the document. Absent ids are a no-op.
    async fn delete_by_id(&self, id: &ContactId) -> Result<(), StoreError>;
}
