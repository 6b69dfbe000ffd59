use crate::document::{Direction, Document, Fields, Query};
use crate::error::Result;
use crate::seed::{article_fields, job_fields};
use crate::retrieval::{ARTICLES, JOBS};
use crate::{ContentStore, ContentWriter};
use async_trait::async_trait;
use jobspot_core::SeedData;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// In-process document store.
///
/// Natural order is insertion order. Queries follow Firestore's rules: a
/// document lacking the order-by field is left out of the results, and the
/// sort is stable so ties keep natural order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store preloaded with a seed file's contents
    pub fn from_seed(seed: &SeedData) -> Self {
        let store = Self::new();
        for job in &seed.jobs {
            store.insert_new(JOBS, job_fields(job));
        }
        for article in &seed.articles {
            store.insert_new(ARTICLES, article_fields(article));
        }
        store
    }

    /// Insert a document with a caller-chosen id
    pub fn insert(&self, collection: &str, document: Document) {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Insert a document under a generated id
    pub fn insert_new(&self, collection: &str, fields: Fields) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("doc{:06}", n);
        self.insert(collection, Document::new(id.clone(), fields));
        id
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .all(Vec::is_empty)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn run_query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<Document> = documents
            .iter()
            .filter(|doc| match &query.filter {
                Some(filter) => doc.get(&filter.field) == Some(&filter.value),
                None => true,
            })
            .filter(|doc| match &query.order_by {
                Some(order) => doc.get(&order.field).is_some(),
                None => true,
            })
            .cloned()
            .collect();

        if let Some(order) = &query.order_by {
            matches.sort_by(|a, b| {
                // Both present: filtered above
                let (Some(x), Some(y)) = (a.get(&order.field), b.get(&order.field)) else {
                    return std::cmp::Ordering::Equal;
                };
                match order.direction {
                    Direction::Ascending => x.order_cmp(y),
                    Direction::Descending => y.order_cmp(x),
                }
            });
        }

        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }

        Ok(matches)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }
}

#[async_trait]
impl ContentWriter for MemoryStore {
    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String> {
        Ok(self.insert_new(collection, fields))
    }
}
