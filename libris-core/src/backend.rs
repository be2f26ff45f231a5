//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over storage implementations, so the
//! document store works the same way against an in-memory map or a MongoDB deployment.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use libris_core::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//!
//! let doc = Bson::Document(doc! { "titre": "Dune", "stock": 3 });
//! let id = backend.insert_document(doc, "livres").await?;
//! let found = backend.get_document(id, "livres").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::{document::DocumentId, error::DocumentStoreResult, query::Query};

/// Abstract interface for document storage backends.
///
/// Documents are exchanged as BSON values that never contain the identifier; the identifier
/// travels next to them. Backends assign identifiers on insertion.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. Concurrent writes to the same identifier are last-write-wins.
///
/// # Error Handling
///
/// Operations return [`DocumentStoreResult<T>`](crate::error::DocumentStoreResult). Absence of
/// a document is never an error at this layer.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document into a collection and returns the identifier assigned to it.
    ///
    /// The collection is created automatically if it doesn't exist.
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<DocumentId>;

    /// Replaces the document stored under `id` entirely.
    ///
    /// If no document has that identifier, nothing is written and the call succeeds.
    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<()>;

    /// Deletes the document stored under `id`.
    ///
    /// Deleting an identifier that does not exist succeeds (idempotent operation).
    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<()>;

    /// Retrieves a single document by identifier, or `None` when it does not exist.
    async fn get_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>>;

    /// Queries documents in a collection using a structured query.
    ///
    /// Returns every matching document together with its identifier. A collection that does
    /// not exist yields an empty result.
    ///
    /// # See Also
    ///
    /// - [`Query`] for constructing queries
    /// - [`crate::query::Filter`] for building filter expressions
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(DocumentId, Bson)>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external connections
    /// should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<DocumentId> {
        StoreBackend::insert_document(*self, document, collection).await
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        StoreBackend::replace_document(*self, id, document, collection).await
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<()> {
        StoreBackend::delete_document(*self, id, collection).await
    }

    async fn get_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        StoreBackend::get_document(*self, id, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(DocumentId, Bson)>> {
        StoreBackend::query_documents(*self, query, collection).await
    }
}

/// Object-safe mirror of [`StoreBackend`], used when the backend is chosen at runtime.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<DocumentId>;
    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<()>;
    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<()>;
    async fn get_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>>;
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(DocumentId, Bson)>>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<DocumentId> {
        StoreBackend::insert_document(self, document, collection).await
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        StoreBackend::replace_document(self, id, document, collection).await
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<()> {
        StoreBackend::delete_document(self, id, collection).await
    }

    async fn get_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        StoreBackend::get_document(self, id, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(DocumentId, Bson)>> {
        StoreBackend::query_documents(self, query, collection).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<DocumentId> {
        DynStoreBackend::insert_document(&**self, document, collection).await
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        DynStoreBackend::replace_document(&**self, id, document, collection).await
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<()> {
        DynStoreBackend::delete_document(&**self, id, collection).await
    }

    async fn get_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        DynStoreBackend::get_document(&**self, id, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(DocumentId, Bson)>> {
        DynStoreBackend::query_documents(&**self, query, collection).await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        DynStoreBackend::shutdown_boxed(self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
