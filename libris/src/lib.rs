//! Libris, a book catalog served over HTTP on top of a document store.
//!
//! The catalog keeps one kind of record, a book, and exposes create, read, update and delete
//! operations on it. The pieces, from the inside out:
//!
//! - [`book`] - The book record and the validation rules for incoming payloads
//! - [`params`] - Listing parameters and their translation into a store query
//! - [`service`] - Catalog operations and their outcomes
//! - [`http`] - The axum router and the mapping of outcomes to responses
//! - [`settings`], [`telemetry`], [`storage`] - Configuration, logging and backend selection
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use libris::prelude::*;
//! use libris::memory::InMemoryStore;
//!
//! let store = Arc::new(DocumentStore::new(InMemoryStore::builder().build().await?));
//! let service = Arc::new(BookService::new(store));
//!
//! let book = service.create(&serde_json::json!({
//!     "titre": "Dune", "auteur": "Herbert", "annee": 1965, "disponible": true,
//!     "genres": ["sf"], "note": 4.8, "stock": 3,
//! })).await?;
//!
//! let app = libris::http::router(service);
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod book;
pub mod http;
pub mod params;
pub mod prelude;
pub mod service;
pub mod settings;
pub mod storage;
pub mod telemetry;

pub use libris_core::{backend, collection, document, error, query, store};

/// In-memory storage backend implementations.
pub mod memory {
    pub use libris_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use libris_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
