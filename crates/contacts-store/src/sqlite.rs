// SPDX-License-Identifier: Apache-2.0

use crate::backend::{ContactStore, StoreError, StoreErrorCode};
use crate::document::ContactDocument;
use crate::ids::IdGenerator;
use async_trait::async_trait;
use contacts_model::{Contact, ContactId};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS contacts (
    _id TEXT PRIMARY KEY,
    doc TEXT NOT NULL
);";

/// Document store backed by a single SQLite file. Each contact is one JSON
/// document keyed by `_id`; insertion order follows `rowid`.
pub struct SqliteContactStore {
    conn: Arc<Mutex<Connection>>,
    ids: IdGenerator,
    path: Option<PathBuf>,
}

fn sqlite_error(err: rusqlite::Error) -> StoreError {
    let code = match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
            StoreErrorCode::Unavailable
        }
        _ => StoreErrorCode::Io,
    };
    StoreError::new(code, err.to_string())
}

impl SqliteContactStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        }
        let conn = Connection::open(path).map_err(sqlite_error)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(sqlite_error)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(sqlite_error)?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(sqlite_error)?;
        let location = path
            .as_deref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
        tracing::info!(path = %location, "sqlite contact store ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            ids: IdGenerator::new(),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| {
                StoreError::new(StoreErrorCode::Internal, "sqlite connection poisoned")
            })?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?
    }
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn find_all(&self) -> Result<Vec<Contact>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare_cached("SELECT doc FROM contacts ORDER BY rowid")
                .map_err(sqlite_error)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(sqlite_error)?;
            let mut out = Vec::new();
            for raw in rows {
                let raw = raw.map_err(sqlite_error)?;
                out.push(ContactDocument::decode(&raw)?.into_contact());
            }
            Ok(out)
        })
        .await
    }

    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, StoreError> {
        let id = id.as_str().to_string();
        self.with_conn(move |conn| {
            let raw: Option<String> = conn
                .query_row("SELECT doc FROM contacts WHERE _id = ?1", params![id], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(sqlite_error)?;
            raw.map(|r| ContactDocument::decode(&r).map(ContactDocument::into_contact))
                .transpose()
        })
        .await
    }

    async fn exists_by_id(&self, id: &ContactId) -> Result<bool, StoreError> {
        let id = id.as_str().to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM contacts WHERE _id = ?1)",
                params![id],
                |row| row.get::<_, bool>(0),
            )
            .map_err(sqlite_error)
        })
        .await
    }

    async fn save(&self, mut contact: Contact) -> Result<Contact, StoreError> {
        if contact.id.is_none() {
            contact.id = Some(self.ids.next_id());
        }
        let doc = ContactDocument::from_contact(&contact)?;
        let raw = doc.encode()?;
        let id = doc.id;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO contacts (_id, doc) VALUES (?1, ?2)
                 ON CONFLICT(_id) DO UPDATE SET doc = excluded.doc",
                params![id, raw],
            )
            .map_err(sqlite_error)?;
            tracing::debug!(id = %id, "sqlite store saved contact");
            Ok(())
        })
        .await?;
        Ok(contact)
    }

    async fn delete_by_id(&self, id: &ContactId) -> Result<(), StoreError> {
        let id = id.as_str().to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM contacts WHERE _id = ?1", params![id])
                .map_err(sqlite_error)?;
            Ok(())
        })
        .await
    }
}
