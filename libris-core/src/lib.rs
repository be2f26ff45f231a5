//! Storage-agnostic document layer for the libris book catalog.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Stored document types, identifiers and BSON conversion
//! - **Store backend abstraction** ([`backend`]) - Traits implemented by the storage backends
//! - **Query and filtering API** ([`query`]) - Filter expressions and sort specifications
//! - **Collections interface** ([`collection`]) - The typed repository over one collection
//! - **Document store** ([`store`]) - The session object wrapping a backend
//! - **Error handling** ([`error`]) - Error and result types

#[allow(unused_extern_crates)]
extern crate self as libris_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
