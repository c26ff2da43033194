// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod backend;
mod document;
mod ids;
mod memory;
mod sqlite;

pub use backend::{ContactStore, StoreError, StoreErrorCode};
pub use document::ContactDocument;
pub use ids::{IdGenerator, OBJECT_ID_HEX_LEN};
pub use memory::MemoryContactStore;
pub use sqlite::SqliteContactStore;

pub const CRATE_NAME: &str = "contacts-store";
