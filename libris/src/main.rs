use std::sync::Arc;

use anyhow::Context;
use libris::{http, settings::Settings, storage, store::DocumentStore, service::BookService, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load libris settings")?;

    telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        "libris bootstrap starting"
    );

    let backend = storage::connect(&settings.database)
        .await
        .with_context(|| "failed to initialize the storage backend")?;
    let store = Arc::new(DocumentStore::new(backend));
    let app = http::router(Arc::new(BookService::new(Arc::clone(&store))));

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(%address, "libris listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "server terminated unexpectedly")?;

    match Arc::try_unwrap(store) {
        Ok(store) => store
            .shutdown()
            .await
            .with_context(|| "failed to shut down the storage backend")?,
        Err(_) => tracing::warn!("store still shared after the server stopped; skipping backend shutdown"),
    }

    tracing::info!("libris stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
}
