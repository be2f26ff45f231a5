//! Typed collection access for document store operations.
//!
//! [`TypedCollection`] is the repository over one collection of a given [`Document`] type.
//! It serializes documents to BSON on the way in, deserializes them on the way out, and
//! parses client-supplied identifiers into [`DocumentId`]s.
//!
//! # Example
//!
//! ```ignore
//! use libris_core::document::Document;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Author {
//!     pub name: String,
//! }
//!
//! impl Document for Author {
//!     fn collection_name() -> &'static str { "authors" }
//! }
//!
//! # async fn example(store: &libris_core::store::DocumentStore<impl libris_core::backend::StoreBackend>) -> libris_core::error::DocumentStoreResult<()> {
//! let authors = store.typed_collection::<Author>();
//! let stored = authors.insert(Author { name: "Herbert".to_string() }).await?;
//! let found = authors.get_by_id(&stored.id.to_string()).await?;
//! # Ok(()) }
//! ```

use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt, DocumentId, Stored},
    error::DocumentStoreResult,
    query::Query,
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lists the documents matching a query.
    ///
    /// # Returns
    ///
    /// Every matching document with its identifier. No match is an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if deserialization or the query fails.
    pub async fn list(&self, query: Query) -> DocumentStoreResult<Vec<Stored<D>>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(|(id, doc)| D::from_bson(doc).map(|document| Stored::new(id, document)))
            .collect::<DocumentStoreResult<Vec<_>>>()
    }

    /// Retrieves a document by its textual identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidId`](crate::error::DocumentStoreError::InvalidId)
    /// when `id` is malformed; a well-formed identifier that matches nothing is `Ok(None)`.
    pub async fn get_by_id(&self, id: &str) -> DocumentStoreResult<Option<Stored<D>>> {
        let id: DocumentId = id.parse()?;

        self.backend
            .get_document(id, self.name())
            .await?
            .map(|doc| D::from_bson(doc).map(|document| Stored::new(id, document)))
            .transpose()
    }

    /// Inserts a new document and returns it together with the identifier the backend assigned.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or insertion fails.
    pub async fn insert(&self, document: D) -> DocumentStoreResult<Stored<D>> {
        let id = self
            .backend
            .insert_document(document.to_bson()?, self.name())
            .await?;

        Ok(Stored::new(id, document))
    }

    /// Replaces the document stored under `id`.
    ///
    /// The previous existence of the document is not checked; replacing an unknown
    /// identifier writes nothing and succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if `id` is malformed,
    /// or if serialization or the update fails.
    pub async fn replace_by_id(&self, id: &str, document: &D) -> DocumentStoreResult<()> {
        let id: DocumentId = id.parse()?;

        self.backend
            .replace_document(id, document.to_bson()?, self.name())
            .await
    }

    /// Deletes the document stored under `id`, succeeding whether or not it existed.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if `id` is malformed
    /// or the deletion fails.
    pub async fn delete_by_id(&self, id: &str) -> DocumentStoreResult<()> {
        let id: DocumentId = id.parse()?;

        self.backend
            .delete_document(id, self.name())
            .await
    }
}
