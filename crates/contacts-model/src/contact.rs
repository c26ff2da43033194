// SPDX-License-Identifier: Apache-2.0

use crate::validation::{validate_draft, ValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned contact identifier. Opaque to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

/// Accepts a JSON string, number or boolean as text. Objects and arrays fail.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(v) => v,
        Scalar::Signed(v) => v.to_string(),
        Scalar::Unsigned(v) => v.to_string(),
        Scalar::Float(v) => v.to_string(),
        Scalar::Bool(v) => v.to_string(),
    }))
}

/// Request body for create and replace. Any `id` the client sends is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub email: Option<String>,
}

impl ContactDraft {
    #[must_use]
    pub fn new(name: &str, surname: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            surname: Some(surname.to_string()),
            phone_number: None,
            email: None,
        }
    }

    #[must_use]
    pub fn with_phone_number(mut self, phone_number: &str) -> Self {
        self.phone_number = Some(phone_number.to_string());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_draft(self)
    }

    /// Validates the draft and turns it into a contact carrying `id`.
    ///
    /// Every field is taken from the draft; nothing is merged from an earlier
    /// version of the record, so a replace is `draft.into_contact(Some(id))`.
    pub fn into_contact(self, id: Option<ContactId>) -> Result<Contact, ValidationError> {
        self.validate()?;
        Ok(Contact {
            id,
            name: self.name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
            phone_number: self.phone_number,
            email: self.email,
        })
    }
}

/// A contact record. `id` is `None` only before the store has assigned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Option<ContactId>,
    pub name: String,
    pub surname: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl Contact {
    #[must_use]
    pub fn with_id(mut self, id: ContactId) -> Self {
        self.id = Some(id);
        self
    }
}
