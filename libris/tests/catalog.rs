use std::sync::Arc;

use libris::{memory::InMemoryStore, prelude::*};
use serde_json::{Value, json};

fn service() -> BookService<InMemoryStore> {
    BookService::new(Arc::new(DocumentStore::new(InMemoryStore::new())))
}

fn book(title: &str, rating: f64, stock: i64) -> Value {
    json!({
        "titre": title,
        "auteur": "Anonyme",
        "annee": 1900,
        "disponible": true,
        "genres": ["roman"],
        "note": rating,
        "stock": stock,
    })
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

fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().map(|book| book.document.title.as_str()).collect()
}

#[tokio::test]
async fn created_book_can_be_read_back() {
    let service = service();

    let created = service.create(&dune()).await.unwrap();
    let fetched = service.get(&created.id.to_string()).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.document.title, "Dune");
    assert_eq!(fetched.document.genres, vec!["sf".to_string()]);
    assert_eq!(fetched.document.rating, 4.8);
}

#[tokio::test]
async fn rejected_book_is_never_stored() {
    let service = service();
    let mut payload = dune();
    payload["annee"] = json!(1700);

    let err = service.create(&payload).await.unwrap_err();

    assert!(matches!(err, ServiceError::Validation(ValidationError::InvalidYear)));
    assert!(matches!(
        service.list(&ListParams::default()).await,
        Err(ServiceError::NoMatchingRecords)
    ));
}

#[tokio::test]
async fn unknown_fields_are_not_persisted() {
    let service = service();
    let mut payload = dune();
    payload["editeur"] = json!("Chilton");

    let created = service.create(&payload).await.unwrap();
    let value = serde_json::to_value(service.get(&created.id.to_string()).await.unwrap()).unwrap();

    assert!(value.get("editeur").is_none());
    assert_eq!(value["_id"], json!(created.id.to_string()));
}

#[tokio::test]
async fn min_rating_keeps_only_books_rated_at_least_that() {
    let service = service();
    for (title, rating) in [("A", 2.0), ("B", 3.5), ("C", 4.9)] {
        service.create(&book(title, rating, 1)).await.unwrap();
    }

    let params = ListParams { min_rating: Some("3.5".into()), sort: Some("note".into()), ..Default::default() };
    let books = service.list(&params).await.unwrap();

    assert_eq!(titles(&books), vec!["B", "C"]);
}

#[tokio::test]
async fn unparseable_min_rating_matches_nothing() {
    let service = service();
    service.create(&dune()).await.unwrap();

    let params = ListParams { min_rating: Some("abc".into()), ..Default::default() };

    assert!(matches!(service.list(&params).await, Err(ServiceError::NoMatchingRecords)));
}

#[tokio::test]
async fn stock_can_be_listed_in_decreasing_order() {
    let service = service();
    for (title, stock) in [("A", 4), ("B", 9), ("C", 0), ("D", 4)] {
        service.create(&book(title, 3.0, stock)).await.unwrap();
    }

    let params = ListParams { sort: Some("stock".into()), order: Some("desc".into()), ..Default::default() };
    let stocks = service
        .list(&params)
        .await
        .unwrap()
        .iter()
        .map(|book| book.document.stock)
        .collect::<Vec<_>>();

    assert_eq!(stocks, vec![9, 4, 4, 0]);
}

#[tokio::test]
async fn filters_combine_with_and() {
    let service = service();
    service.create(&dune()).await.unwrap();

    let mut unavailable = dune();
    unavailable["titre"] = json!("Dune Messiah");
    unavailable["disponible"] = json!(false);
    service.create(&unavailable).await.unwrap();

    let mut other_genre = dune();
    other_genre["titre"] = json!("Chapterhouse");
    other_genre["genres"] = json!(["roman"]);
    service.create(&other_genre).await.unwrap();

    let params = ListParams {
        author: Some("Herbert".into()),
        available: Some("true".into()),
        genre: Some("sf".into()),
        ..Default::default()
    };

    assert_eq!(titles(&service.list(&params).await.unwrap()), vec!["Dune"]);
}

#[tokio::test]
async fn missing_book_is_not_found() {
    let service = service();
    let id = DocumentId::new().to_string();

    assert!(matches!(service.get(&id).await, Err(ServiceError::NotFound { id: missing }) if missing == id));
}

#[tokio::test]
async fn malformed_id_is_a_storage_error() {
    let service = service();

    assert!(matches!(
        service.get("not-an-id").await,
        Err(ServiceError::Storage(DocumentStoreError::InvalidId(_)))
    ));
}

#[tokio::test]
async fn update_replaces_every_field() {
    let service = service();
    let created = service.create(&dune()).await.unwrap();
    let id = created.id.to_string();

    let updated = service.update(&id, &book("Dune (poche)", 4.0, 12)).await.unwrap();
    let fetched = service.get(&id).await.unwrap();

    assert_eq!(fetched.document, updated);
    assert_eq!(fetched.document.author, "Anonyme");
    assert_eq!(fetched.document.stock, 12);
}

#[tokio::test]
async fn update_refuses_body_identifier_before_writing() {
    let service = service();
    let created = service.create(&dune()).await.unwrap();
    let id = created.id.to_string();

    let mut payload = book("Autre", 1.0, 1);
    payload["_id"] = json!(DocumentId::new().to_string());
    payload["annee"] = json!(1700);

    let err = service.update(&id, &payload).await.unwrap_err();

    assert!(matches!(err, ServiceError::Validation(ValidationError::IdNotAllowed("_id"))));
    assert_eq!(service.get(&id).await.unwrap(), created);
}

#[tokio::test]
async fn update_of_missing_book_succeeds_without_creating_it() {
    let service = service();
    let id = DocumentId::new().to_string();

    service.update(&id, &dune()).await.unwrap();

    assert!(matches!(service.get(&id).await, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let service = service();
    let created = service.create(&dune()).await.unwrap();
    let id = created.id.to_string();

    service.delete(&id).await.unwrap();
    service.delete(&id).await.unwrap();

    assert!(matches!(service.get(&id).await, Err(ServiceError::NotFound { .. })));
}
