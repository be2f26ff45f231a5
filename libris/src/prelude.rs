//! Convenient re-exports of the types most callers need.
//!
//! ```ignore
//! use libris::prelude::*;
//! ```

pub use libris_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{Document, DocumentId, Stored},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Filter, Query, SortDirection},
    store::DocumentStore,
};

pub use crate::{
    book::{Book, BookRecord, ValidationError},
    params::ListParams,
    service::{BookService, ServiceError, ServiceResult},
};
