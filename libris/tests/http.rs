use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use libris::{http::router, memory::InMemoryStore, prelude::*};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(DocumentStore::new(InMemoryStore::new()));
    router(Arc::new(BookService::new(store)))
}

fn dune() -> Value {
    json!({
        "titre": "Dune",
        "auteur": "Herbert",
        "annee": 1965,
        "disponible": true,
        "genres": ["sf"],
        "note": 4.8,
        "stock": 3,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/json");
    }
    let request = request
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

async fn create(app: &Router, payload: &Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/livres", Some(&payload.to_string())).await
}

#[tokio::test]
async fn create_returns_201_with_identifier() {
    let app = app();

    let (status, body) = create(&app, &dune()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["_id"].is_string());
    assert_eq!(body["titre"], "Dune");
}

#[tokio::test]
async fn created_book_is_served_by_id() {
    let app = app();
    let (_, created) = create(&app, &dune()).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/livres/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn invalid_payload_is_400_with_message() {
    let app = app();
    let mut payload = dune();
    payload["annee"] = json!(1700);

    let (status, body) = create(&app, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("annee"));

    let (status, body) = send(&app, Method::GET, "/livres", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "no matching records" }));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/livres", Some("{ not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn list_applies_query_parameters() {
    let app = app();
    create(&app, &dune()).await;
    let mut classic = dune();
    classic["titre"] = json!("Fondation");
    classic["auteur"] = json!("Asimov");
    classic["note"] = json!(3.0);
    create(&app, &classic).await;

    let (status, body) = send(&app, Method::GET, "/livres?minNote=4&tri=note&ordre=desc", None).await;

    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["titre"], "Dune");
}

#[tokio::test]
async fn repeated_query_parameter_is_400_with_message() {
    let app = app();
    create(&app, &dune()).await;

    let (status, body) = send(&app, Method::GET, "/livres?auteur=a&auteur=b", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some_and(|message| !message.is_empty()));
}

#[tokio::test]
async fn unknown_book_is_404() {
    let app = app();
    let id = DocumentId::new();

    let (status, body) = send(&app, Method::GET, &format!("/livres/{id}"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "not found" }));
}

#[tokio::test]
async fn malformed_id_is_500() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/livres/not-an-id", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("not-an-id"));
}

#[tokio::test]
async fn update_returns_normalized_record_without_identifier() {
    let app = app();
    let (_, created) = create(&app, &dune()).await;
    let id = created["_id"].as_str().unwrap();
    let mut payload = dune();
    payload["stock"] = json!(10);
    payload["editeur"] = json!("Chilton");

    let (status, body) = send(&app, Method::PUT, &format!("/livres/{id}"), Some(&payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 10);
    assert!(body.get("_id").is_none());
    assert!(body.get("editeur").is_none());
}

#[tokio::test]
async fn update_with_body_identifier_is_400() {
    let app = app();
    let (_, created) = create(&app, &dune()).await;
    let id = created["_id"].as_str().unwrap();
    let mut payload = dune();
    payload["_id"] = json!("ailleurs");

    let (status, _) = send(&app, Method::PUT, &format!("/livres/{id}"), Some(&payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_always_answers_deleted() {
    let app = app();
    let (_, created) = create(&app, &dune()).await;
    let id = created["_id"].as_str().unwrap();

    for _ in 0..2 {
        let (status, body) = send(&app, Method::DELETE, &format!("/livres/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "deleted" }));
    }

    let (status, _) = send(&app, Method::GET, &format!("/livres/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_answers_ok() {
    let app = app();
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    assert_eq!(&bytes[..], b"ok");
}
