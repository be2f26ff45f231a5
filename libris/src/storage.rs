//! Backend selection at startup.

use libris_core::backend::{DynStoreBackend, StoreBackendBuilder};
use libris_memory::InMemoryStore;

use crate::settings::{BackendKind, DatabaseSettings};

/// Builds the backend named in the settings.
///
/// # Errors
///
/// Fails when the backend cannot be initialized, or when `mongodb` is requested from a build
/// without the `mongodb` feature.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Box<dyn DynStoreBackend>> {
    match settings.backend {
        BackendKind::Memory => {
            tracing::warn!("using the in-memory backend; the catalog is lost on exit");

            Ok(Box::new(InMemoryStore::builder().build().await?))
        }
        #[cfg(feature = "mongodb")]
        BackendKind::Mongodb => {
            tracing::info!(database = %settings.name, "connecting to MongoDB");

            Ok(Box::new(
                libris_mongodb::MongoDbStore::builder(&settings.uri, &settings.name)
                    .build()
                    .await?,
            ))
        }
        #[cfg(not(feature = "mongodb"))]
        BackendKind::Mongodb => Err(anyhow::anyhow!(
            "database.backend is 'mongodb' but libris was built without the `mongodb` feature"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use libris_core::backend::StoreBackend;

    #[tokio::test]
    async fn memory_backend_is_usable_through_the_box() {
        let backend = connect(&DatabaseSettings::default()).await.unwrap();
        let id = StoreBackend::insert_document(&backend, Bson::Document(doc! { "titre": "Dune" }), "livres")
            .await
            .unwrap();

        assert!(StoreBackend::get_document(&backend, id, "livres").await.unwrap().is_some());
        StoreBackend::shutdown(backend).await.unwrap();
    }

    #[cfg(not(feature = "mongodb"))]
    #[tokio::test]
    async fn mongodb_requires_the_feature() {
        let settings = DatabaseSettings { backend: BackendKind::Mongodb, ..DatabaseSettings::default() };
        assert!(connect(&settings).await.is_err());
    }
}
