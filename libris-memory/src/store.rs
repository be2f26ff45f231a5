//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON values in nested HashMaps behind an async-aware read-write
//! lock. Nothing survives the process.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Bson;

use libris_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::DocumentId,
    error::DocumentStoreResult,
    query::{Query, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type CollectionMap = HashMap<DocumentId, Bson>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Performance
///
/// Queries scan every document in the collection. There is no indexing.
///
/// # Example
///
/// ```ignore
/// use libris_memory::InMemoryStore;
/// use libris_core::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = store.insert_document(Bson::Document(doc! { "titre": "Dune" }), "livres").await?;
/// assert!(store.get_document(id, "livres").await?.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<DocumentId> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        let mut id = DocumentId::new();
        while collection_map.contains_key(&id) {
            id = DocumentId::new();
        }

        collection_map.insert(id, document);

        Ok(id)
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;

        // Unknown ids are left alone; replacing never creates a document.
        if let Some(existing) = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(&id))
        {
            *existing = document;
        }

        Ok(())
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;

        if let Some(collection_map) = store.get_mut(collection) {
            collection_map.remove(&id);
        }

        Ok(())
    }

    async fn get_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .and_then(|collection_map| collection_map.get(&id))
                .cloned()
        )
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(DocumentId, Bson)>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = Vec::with_capacity(collection_map.len());

        for (id, doc) in collection_map {
            let keep = match &query.filter {
                Some(filter) => DocumentEvaluator::new(doc).evaluate(filter)?,
                None => true,
            };

            if keep {
                documents.push((*id, doc.clone()));
            }
        }

        if let Some(sort) = &query.sort {
            documents.sort_by(|(_, a), (_, b)| {
                let left = Comparable::field(a, &sort.field);
                let right = Comparable::field(b, &sort.field);

                match sort.direction {
                    SortDirection::Asc => left.sort_cmp(&right),
                    SortDirection::Desc => right.sort_cmp(&left),
                }
            });
        }

        Ok(documents)
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use libris_memory::InMemoryStore;
/// use libris_core::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new, empty [`InMemoryStore`]. Never fails.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
