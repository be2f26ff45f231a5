//! Core traits and types for document representation and serialization.
//!
//! This module provides the trait that every stored document type implements, the opaque
//! [`DocumentId`] assigned by a backend when a document is inserted, and [`Stored`], which
//! pairs a document with that identifier once it has been persisted.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Core trait that all documents stored in a document store must implement.
///
/// A document type carries only its own fields. Identifiers are owned by the store and are
/// never part of the document body, which keeps client input from choosing or overwriting them.
///
/// # Example
///
/// ```ignore
/// use libris_core::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Author {
///     pub name: String,
/// }
///
/// impl Document for Author {
///     fn collection_name() -> &'static str {
///         "authors"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "livres").
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Opaque identifier assigned to a document by the storage backend.
///
/// Identifiers are random UUIDs. Their textual form is the hyphenated UUID string, which is
/// what clients see and send back in resource paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(uuid::Uuid);

impl DocumentId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = DocumentStoreError;

    /// Parses a client-supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidId`] when the input is not a UUID.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| DocumentStoreError::InvalidId(format!("{input}: {e}")))
    }
}

impl From<DocumentId> for bson::Uuid {
    fn from(id: DocumentId) -> Self {
        bson::Uuid::from_bytes(*id.0.as_bytes())
    }
}

impl From<bson::Uuid> for DocumentId {
    fn from(id: bson::Uuid) -> Self {
        Self(uuid::Uuid::from_bytes(id.bytes()))
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        Bson::from(bson::Uuid::from(id))
    }
}

/// A document together with the identifier the store assigned to it.
///
/// Serializes flat, with the identifier under `_id` next to the document's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<D> {
    /// Identifier assigned by the backend on insertion.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// The document body.
    #[serde(flatten)]
    pub document: D,
}

impl<D> Stored<D> {
    /// Pairs a document with its identifier.
    pub fn new(id: DocumentId, document: D) -> Self {
        Self { id, document }
    }

    /// Discards the identifier and returns the document body.
    pub fn into_document(self) -> D {
        self.document
    }
}
