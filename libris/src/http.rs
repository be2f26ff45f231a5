//! HTTP binding of the catalog.
//!
//! | Method | Path           | Operation |
//! |--------|----------------|-----------|
//! | GET    | `/livres`      | list      |
//! | POST   | `/livres`      | create    |
//! | GET    | `/livres/{id}` | get       |
//! | PUT    | `/livres/{id}` | update    |
//! | DELETE | `/livres/{id}` | delete    |
//! | GET    | `/healthz`     | liveness  |
//!
//! Every failure is answered with a `{"message": ...}` body.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use libris_core::backend::StoreBackend;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};

use crate::{
    book::{Book, BookRecord},
    params::ListParams,
    service::{BookService, ServiceError},
};

/// Body of every non-record response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The body or the query string could not be read.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::Validation(_)) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::NotFound { .. } | ServiceError::NoMatchingRecords) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status_code = %status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status_code = %status.as_u16(), error = %self, "request refused");
        }

        (status, Json(MessageBody::new(self.to_string()))).into_response()
    }
}

/// Builds the application router over a shared catalog service.
pub fn router<B: StoreBackend + 'static>(service: Arc<BookService<B>>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/livres", get(list_books::<B>).post(create_book::<B>))
        .route(
            "/livres/{id}",
            get(get_book::<B>)
                .put(update_book::<B>)
                .delete(delete_book::<B>),
        )
        .with_state(service)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new().level(tracing::Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_books<B: StoreBackend + 'static>(
    State(service): State<Arc<BookService<B>>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(service.list(&params).await?))
}

async fn get_book<B: StoreBackend + 'static>(
    State(service): State<Arc<BookService<B>>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(service.get(&id).await?))
}

async fn create_book<B: StoreBackend + 'static>(
    State(service): State<Arc<BookService<B>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(payload) = payload?;

    Ok((StatusCode::CREATED, Json(service.create(&payload).await?)))
}

async fn update_book<B: StoreBackend + 'static>(
    State(service): State<Arc<BookService<B>>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookRecord>, ApiError> {
    let Json(payload) = payload?;

    Ok(Json(service.update(&id, &payload).await?))
}

async fn delete_book<B: StoreBackend + 'static>(
    State(service): State<Arc<BookService<B>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    service.delete(&id).await?;

    Ok(Json(MessageBody::new("deleted")))
}
