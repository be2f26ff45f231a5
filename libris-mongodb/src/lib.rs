//! MongoDB backend implementation for libris.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! persisting the catalog in a MongoDB database and delegating filtering and sorting
//! to the server.
//!
//! The application only links it when built with the `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! libris = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! Documents are stored with their identifier as a UUID (binary subtype 4) under `_id`.
//!
//! # Example
//!
//! ```ignore
//! use libris_core::backend::StoreBackendBuilder;
//! use libris_mongodb::MongoDbStore;
//!
//! let store = MongoDbStore::builder("mongodb://localhost:27017", "bibliothèque")
//!     .build()
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as libris_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
