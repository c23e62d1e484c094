//! In-process API tests against the in-memory catalog

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use biblioteca_server::{
    api::create_router,
    error::{AppError, AppResult},
    models::{Book, Library, LibraryWithBookCount, NewBook, NewLibrary},
    repository::{CatalogStore, MemoryCatalog, Repository},
    config::StorageBackend,
    AppConfig, AppState,
};

fn app() -> Router {
    app_with(Repository::in_memory(MemoryCatalog::new()))
}

fn app_with(repository: Repository) -> Router {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    create_router(AppState::new(config, repository))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, &format!("/api/v1{}", uri), body).await
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_library(app: &Router, name: &str, date: Value) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/bibliotecas",
        Some(json!({ "nome": name, "data_criacao": date })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

async fn create_book(app: &Router, title: &str, library_id: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/livros",
        Some(json!({
            "titulo": title,
            "autor": "Machado de Assis",
            "ano_publicacao": 1899,
            "biblioteca_id": library_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_unprefixed_routes_share_the_catalog() {
    let app = app();
    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/bibliotecas",
        Some(json!({ "nome": "Central", "data_criacao": 2023 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/bibliotecas/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Central");

    let (status, body) = send_raw(&app, Method::GET, "/bibliotecas/com-quantidade", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["total_livros"], 0);
}

#[tokio::test]
async fn test_create_library_normalizes_year() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/bibliotecas",
        Some(json!({ "nome": "Central", "data_criacao": 2023 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["nome"], "Central");
    assert_eq!(body["data_criacao"], "2023-01-01");
    assert!(body["id"].is_number());

    create_library(&app, "Municipal", json!("2020-05-01")).await;

    let (status, body) = send(&app, Method::GET, "/bibliotecas", None).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["data_criacao"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2023-01-01", "2020-05-01"]);
}

#[tokio::test]
async fn test_create_library_missing_fields() {
    let app = app();
    for body in [
        json!({ "data_criacao": 2023 }),
        json!({ "nome": "Central" }),
        json!({ "nome": "", "data_criacao": "2023" }),
    ] {
        let (status, response) = send(&app, Method::POST, "/bibliotecas", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "BadValue");
    }

    let (_, body) = send(&app, Method::GET, "/bibliotecas", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/livros",
        Some(json!({ "titulo": ["not", "a", "string"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_update_library() {
    let app = app();
    let id = create_library(&app, "Central", json!(2023)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/bibliotecas/{}", id),
        Some(json!({ "nome": "Biblioteca Central", "data_criacao": "1990" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, body) = send(&app, Method::GET, &format!("/bibliotecas/{}", id), None).await;
    assert_eq!(body["nome"], "Biblioteca Central");
    assert_eq!(body["data_criacao"], "1990-01-01");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/bibliotecas/999",
        Some(json!({ "nome": "Nowhere", "data_criacao": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/bibliotecas/{}", id),
        Some(json!({ "nome": "Central" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_end_to_end_cascade() {
    let app = app();
    let library_id = create_library(&app, "Central", json!(2023)).await;
    let book_id = create_book(&app, "Dom Casmurro", library_id).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/bibliotecas/{}/livros/quantidade", library_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "biblioteca_id": library_id, "total_livros": 1 }));

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/bibliotecas/{}", library_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["livros_removidos"], 1);

    let (_, books) = send(&app, Method::GET, "/livros", None).await;
    assert!(books
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["id"].as_i64() != Some(book_id)));

    let (status, books) = send(
        &app,
        Method::GET,
        &format!("/bibliotecas/{}/livros", library_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_delete_missing_library_is_not_found() {
    let app = app();
    let library_id = create_library(&app, "Central", json!(2023)).await;
    create_book(&app, "Dom Casmurro", library_id).await;

    for _ in 0..2 {
        let (status, body) = send(&app, Method::DELETE, "/bibliotecas/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NoSuchData");
    }

    let (_, libraries) = send(&app, Method::GET, "/bibliotecas", None).await;
    assert_eq!(libraries.as_array().unwrap().len(), 1);
    let (_, books) = send(&app, Method::GET, "/livros", None).await;
    assert_eq!(books.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_libraries_with_counts_include_empty() {
    let app = app();
    let central = create_library(&app, "Central", json!(2023)).await;
    let empty = create_library(&app, "Escolar", json!(2023)).await;
    create_book(&app, "Dom Casmurro", central).await;
    create_book(&app, "O Cortiço", central).await;

    let (status, body) = send(&app, Method::GET, "/bibliotecas/com-quantidade", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let expected = if row["id"].as_i64() == Some(central) { 2 } else { 0 };
        assert_eq!(row["total_livros"], expected);
    }
    assert!(rows.iter().any(|r| r["id"].as_i64() == Some(empty)));
}

#[tokio::test]
async fn test_book_crud() {
    let app = app();
    let first = create_library(&app, "Central", json!(2023)).await;
    let second = create_library(&app, "Municipal", json!(2023)).await;
    let book_id = create_book(&app, "Dom Casmurro", first).await;

    let (status, body) = send(&app, Method::GET, &format!("/livros/{}", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["titulo"], "Dom Casmurro");
    assert_eq!(body["biblioteca_id"], first);

    // Full replace, moving the book to another library
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/livros/{}", book_id),
        Some(json!({
            "titulo": "Quincas Borba",
            "autor": "Machado de Assis",
            "ano_publicacao": "1891",
            "biblioteca_id": second
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, &format!("/livros/{}", book_id), None).await;
    assert_eq!(body["titulo"], "Quincas Borba");
    assert_eq!(body["ano_publicacao"], 1891);
    assert_eq!(body["biblioteca_id"], second);

    let (_, body) = send(&app, Method::GET, &format!("/bibliotecas/{}/livros", first), None).await;
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/livros/{}", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &format!("/livros/{}", book_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &format!("/livros/{}", book_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_validation() {
    let app = app();
    let library_id = create_library(&app, "Central", json!(2023)).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/livros",
        Some(json!({ "titulo": "Dom Casmurro", "autor": "Machado de Assis", "biblioteca_id": library_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown library
    let (status, _) = send(
        &app,
        Method::POST,
        "/livros",
        Some(json!({
            "titulo": "Dom Casmurro",
            "autor": "Machado de Assis",
            "ano_publicacao": 1899,
            "biblioteca_id": 999
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/livros/999",
        Some(json!({
            "titulo": "Dom Casmurro",
            "autor": "Machado de Assis",
            "ano_publicacao": 1899,
            "biblioteca_id": library_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, books) = send(&app, Method::GET, "/livros", None).await;
    assert_eq!(books, json!([]));
}

/// Store whose backing database is unreachable
struct OfflineStore;

fn offline<T>() -> AppResult<T> {
    Err(AppError::Database(sqlx::Error::PoolClosed))
}

#[async_trait]
impl CatalogStore for OfflineStore {
    async fn ping(&self) -> AppResult<()> { offline() }
    async fn library_list(&self) -> AppResult<Vec<Library>> { offline() }
    async fn library_get(&self, _id: i32) -> AppResult<Library> { offline() }
    async fn library_create(&self, _data: &NewLibrary) -> AppResult<Library> { offline() }
    async fn library_update(&self, _id: i32, _data: &NewLibrary) -> AppResult<Library> { offline() }
    async fn library_delete(&self, _id: i32) -> AppResult<u64> { offline() }
    async fn library_count_books(&self, _id: i32) -> AppResult<i64> { offline() }
    async fn library_list_with_book_counts(&self) -> AppResult<Vec<LibraryWithBookCount>> { offline() }
    async fn book_list(&self) -> AppResult<Vec<Book>> { offline() }
    async fn book_list_for_library(&self, _library_id: i32) -> AppResult<Vec<Book>> { offline() }
    async fn book_get(&self, _id: i32) -> AppResult<Book> { offline() }
    async fn book_create(&self, _data: &NewBook) -> AppResult<Book> { offline() }
    async fn book_update(&self, _id: i32, _data: &NewBook) -> AppResult<Book> { offline() }
    async fn book_delete(&self, _id: i32) -> AppResult<()> { offline() }
}

#[tokio::test]
async fn test_storage_fault_is_server_error() {
    let app = app_with(Repository::from_store(OfflineStore));

    for (method, uri) in [
        (Method::GET, "/bibliotecas"),
        (Method::GET, "/bibliotecas/com-quantidade"),
        (Method::GET, "/bibliotecas/1/livros/quantidade"),
        (Method::DELETE, "/bibliotecas/1"),
        (Method::GET, "/livros"),
        (Method::GET, "/ready"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body["error"], "DbFailure");
    }

    // Validation still happens before the store is touched
    let (status, _) = send(
        &app,
        Method::POST,
        "/bibliotecas",
        Some(json!({ "nome": "Central" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
