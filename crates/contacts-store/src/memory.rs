// SPDX-License-Identifier: Apache-2.0

use crate::backend::{ContactStore, StoreError};
use crate::ids::IdGenerator;
use async_trait::async_trait;
use contacts_model::{Contact, ContactId};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collection {
    next_seq: u64,
    documents: HashMap<ContactId, (u64, Contact)>,
}

/// Process-local collection. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryContactStore {
    ids: IdGenerator,
    collection: RwLock<Collection>,
}

impl MemoryContactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            ids,
            collection: RwLock::new(Collection::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.collection.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn find_all(&self) -> Result<Vec<Contact>, StoreError> {
        let lock = self.collection.read().await;
        let mut rows: Vec<&(u64, Contact)> = lock.documents.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, c)| c.clone()).collect())
    }

    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, StoreError> {
        Ok(self
            .collection
            .read()
            .await
            .documents
            .get(id)
            .map(|(_, c)| c.clone()))
    }

    async fn exists_by_id(&self, id: &ContactId) -> Result<bool, StoreError> {
        Ok(self.collection.read().await.documents.contains_key(id))
    }

    async fn save(&self, mut contact: Contact) -> Result<Contact, StoreError> {
        let id = match contact.id.clone() {
            Some(id) => id,
            None => {
                let id = self.ids.next_id();
                contact.id = Some(id.clone());
                id
            }
        };
        let mut lock = self.collection.write().await;
        let seq = match lock.documents.get(&id) {
            Some((seq, _)) => *seq,
            None => {
                lock.next_seq += 1;
                lock.next_seq
            }
        };
        tracing::debug!(id = %id, seq, "memory store saved contact");
        lock.documents.insert(id, (seq, contact.clone()));
        Ok(contact)
    }

    async fn delete_by_id(&self, id: &ContactId) -> Result<(), StoreError> {
        self.collection.write().await.documents.remove(id);
        Ok(())
    }
}
