//! Content store access for the `jobs` and `articles` collections.
//!
//! The store is always passed in explicitly: build one client at startup
//! ([`FirestoreClient`] or [`MemoryStore`]), wrap it in an `Arc`, and hand
//! references to the [`retrieval`] functions.

pub mod document;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod retrieval;
pub mod seed;

pub use document::{Direction, Document, FieldError, Fields, Query, Value};
pub use error::{Result, StoreError};
pub use firestore::FirestoreClient;
pub use memory::MemoryStore;
pub use retrieval::{get_article_by_slug, get_job_by_id, list_articles, list_jobs};

use async_trait::async_trait;

/// Read access to a document database
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a query against one collection, returning documents in query order
    async fn run_query(&self, collection: &str, query: &Query) -> Result<Vec<Document>>;

    /// Point lookup by document id; `Ok(None)` when it does not exist
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>>;
}

/// Write access, used only by the seeding command
#[async_trait]
pub trait ContentWriter: Send + Sync {
    /// Add a document with a store-generated id and return that id
    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String>;
}
