// SPDX-License-Identifier: Apache-2.0

use crate::backend::{StoreError, StoreErrorCode};
use contacts_model::{Contact, ContactId};
use serde::{Deserialize, Serialize};

/// Stored form of a contact. The identifier lives under `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactDocument {
    pub fn from_contact(contact: &Contact) -> Result<Self, StoreError> {
        let id = contact.id.as_ref().ok_or_else(|| {
            StoreError::new(
                StoreErrorCode::Internal,
                "contact must carry an id before it is stored",
            )
        })?;
        Ok(Self {
            id: id.as_str().to_string(),
            name: contact.name.clone(),
            surname: contact.surname.clone(),
            phone_number: contact.phone_number.clone(),
            email: contact.email.clone(),
        })
    }

    #[must_use]
    pub fn into_contact(self) -> Contact {
        Contact {
            id: Some(ContactId::new(self.id)),
            name: self.name,
            surname: self.surname,
            phone_number: self.phone_number,
            email: self.email,
        }
    }

    pub fn encode(&self) -> Result<String, StoreError> {
        serde_json::to_string(self)
            .map_err(|e| StoreError::new(StoreErrorCode::Codec, e.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw)
            .map_err(|e| StoreError::new(StoreErrorCode::Codec, e.to_string()))
    }
}
