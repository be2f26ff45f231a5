//! In-memory document storage backend for libris.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development,
//! tests and single-process deployments where losing the catalog on restart is acceptable.
//!
//! # Quick Start
//!
//! ```ignore
//! use libris_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use libris_memory::InMemoryStore;
//!
//! let backend = InMemoryStore::builder().build().await?;
//! let store = DocumentStore::new(backend);
//! let books = store.typed_collection::<BookRecord>();
//! ```

#[allow(unused_extern_crates)]
extern crate self as libris_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
