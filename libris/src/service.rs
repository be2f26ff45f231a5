//! Catalog operations.
//!
//! [`BookService`] sits between the HTTP layer and the store: it validates input, builds
//! queries, calls the repository, and turns what comes back into [`ServiceError`] outcomes.
//! Validation always happens before anything is written.

use std::sync::Arc;

use libris_core::{
    backend::StoreBackend,
    collection::TypedCollection,
    error::DocumentStoreError,
    store::DocumentStore,
};
use serde_json::Value;
use thiserror::Error;

use crate::{
    book::{self, Book, BookRecord, ValidationError},
    params::ListParams,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not found")]
    NotFound { id: String },
    #[error("no matching records")]
    NoMatchingRecords,
    #[error(transparent)]
    Storage(#[from] DocumentStoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Book catalog operations over a shared store session.
#[derive(Debug)]
pub struct BookService<B: StoreBackend> {
    store: Arc<DocumentStore<B>>,
}

impl<B: StoreBackend> BookService<B> {
    pub fn new(store: Arc<DocumentStore<B>>) -> Self {
        Self { store }
    }

    fn books(&self) -> TypedCollection<'_, B, BookRecord> {
        self.store.typed_collection::<BookRecord>()
    }

    /// Lists the books matching `params`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NoMatchingRecords`] when nothing matches, [`ServiceError::Storage`] when
    /// the store fails.
    pub async fn list(&self, params: &ListParams) -> ServiceResult<Vec<Book>> {
        let books = self
            .books()
            .list(params.to_query())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to list books"))?;

        if books.is_empty() {
            tracing::debug!(?params, "no book matches the listing parameters");
            return Err(ServiceError::NoMatchingRecords);
        }

        Ok(books)
    }

    /// Fetches one book.
    ///
    /// A malformed identifier is a storage error, not a missing book.
    pub async fn get(&self, id: &str) -> ServiceResult<Book> {
        self.books()
            .get_by_id(id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %id, "failed to read book"))?
            .ok_or_else(|| ServiceError::NotFound { id: id.to_string() })
    }

    /// Validates `payload` and stores it as a new book.
    pub async fn create(&self, payload: &Value) -> ServiceResult<Book> {
        let record = book::validate(payload)
            .inspect_err(|e| tracing::info!(field = e.field(), reason = %e, "rejected new book"))?;

        let book = self
            .books()
            .insert(record)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to insert book"))?;

        tracing::info!(id = %book.id, "book created");

        Ok(book)
    }

    /// Replaces the book stored under `id` with the validated `payload`.
    ///
    /// An identifier in the body is refused before any other rule. Replacing an unknown
    /// identifier writes nothing and still succeeds. The normalized record is returned as
    /// submitted, without reading it back.
    pub async fn update(&self, id: &str, payload: &Value) -> ServiceResult<BookRecord> {
        let record = book::reject_identifier(payload)
            .and_then(|_| book::validate(payload))
            .inspect_err(|e| tracing::info!(field = e.field(), reason = %e, %id, "rejected book update"))?;

        self.books()
            .replace_by_id(id, &record)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %id, "failed to replace book"))?;

        tracing::info!(%id, "book replaced");

        Ok(record)
    }

    /// Deletes the book stored under `id`, whether or not it exists.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.books()
            .delete_by_id(id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %id, "failed to delete book"))?;

        tracing::info!(%id, "book deleted");

        Ok(())
    }
}
