use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc, de::deserialize_from_bson};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};
use libris_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::DocumentId,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Query, QueryVisitor},
};

use crate::query::MongoQueryTranslator;

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(uri: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(uri, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    /// Unwraps the document body, dropping any `_id` it might carry.
    fn prepare_document(document: Bson) -> DocumentStoreResult<Document> {
        match document {
            Bson::Document(mut body) => {
                body.remove("_id");
                Ok(body)
            }
            _ => Err(DocumentStoreError::InvalidDocument("Expected document".into())),
        }
    }

    /// Splits a stored MongoDB document into its identifier and its body.
    fn restore_document(mut document: Document) -> DocumentStoreResult<(DocumentId, Bson)> {
        let id = document
            .remove("_id")
            .ok_or_else(|| DocumentStoreError::InvalidDocument("Missing _id".into()))?;
        let id: bson::Uuid = deserialize_from_bson(id)?;

        Ok((DocumentId::from(id), Bson::Document(document)))
    }
}

fn backend_error(err: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<DocumentId> {
        let id = DocumentId::new();
        let mut body = Self::prepare_document(document)?;
        body.insert("_id", id);

        self.get_collection(collection)
            .insert_one(body)
            .await
            .map_err(backend_error)?;

        Ok(id)
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        // Without upsert an unknown id matches nothing and nothing is written.
        self.get_collection(collection)
            .replace_one(doc! { "_id": id }, Self::prepare_document(document)?)
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn get_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        self.get_collection(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(backend_error)?
            .map(|doc| Self::restore_document(doc).map(|(_, body)| body))
            .transpose()
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(DocumentId, Bson)>> {
        let mut options = FindOptions::default();

        if let Some(sort) = &query.sort {
            options.sort = Some(MongoQueryTranslator::sort_document(sort));
        }

        self.get_collection(collection)
            .find(
                if let Some(expr) = &query.filter {
                    MongoQueryTranslator.visit_expr(expr)?
                } else {
                    doc! {}
                },
            )
            .with_options(options)
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)?
            .into_iter()
            .map(Self::restore_document)
            .collect::<DocumentStoreResult<Vec<_>>>()
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    uri: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(uri: &str, database: &str) -> Self {
        Self {
            uri: uri.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Parses the connection string and creates the client.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the first operation
    /// rather than here.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.uri)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
