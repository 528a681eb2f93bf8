#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use atelier_api::config::ServerConfig;
use atelier_api::images::ImageStorage;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_db::{repositories, ConnectMode, MemoryStore, StoreBackend, StoreConfig, StoreHandle};

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "atelier-test-boundary";

/// Build a test `ServerConfig` with safe defaults: any CORS origin, inline
/// images, and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: atelier_api::config::DEFAULT_MAX_UPLOAD_BYTES,
        image_storage: ImageStorage::Inline,
        store: StoreConfig {
            backend: StoreBackend::Memory,
            uri: None,
            database: "atelier-test".to_string(),
            connect: ConnectMode::Lazy,
            server_selection_timeout: std::time::Duration::from_millis(200),
        },
    }
}

/// Same as [`test_config`] but writing images into `dir`.
pub fn disk_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        image_storage: ImageStorage::Disk {
            upload_dir: dir.to_path_buf(),
        },
        ..test_config()
    }
}

/// A fresh in-memory store with the production unique indexes.
pub fn memory_store() -> StoreHandle {
    Arc::new(MemoryStore::new(repositories::unique_indexes()))
}

/// Build the full application router over `store`, using the same builder
/// as `main.rs` so tests exercise the production middleware stack.
pub fn build_test_app(store: StoreHandle) -> Router {
    build_test_app_with_config(store, test_config())
}

pub fn build_test_app_with_config(store: StoreHandle, config: ServerConfig) -> Router {
    build_app_router(AppState::new(store, config))
}

/// Router over an empty in-memory store.
pub fn memory_app() -> Router {
    build_test_app(memory_store())
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    send_multipart(app, Method::POST, uri, body).await
}

pub async fn put_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    send_multipart(app, Method::PUT, uri, body).await
}

async fn send_multipart(app: Router, method: Method, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Encode text fields and an optional `(filename, bytes)` image part.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, Vec<u8>)>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// [`png_bytes`] as a `data:image/png;base64,...` URI.
pub fn png_data_uri(width: u32, height: u32) -> String {
    use base64::Engine;
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png_bytes(width, height))
    )
}

/// Decode an inline image reference and return its dimensions.
pub fn data_uri_dimensions(uri: &str) -> (u32, u32) {
    use base64::Engine;
    let payload = uri
        .strip_prefix("data:image/png;base64,")
        .expect("stored image should be a PNG data URI");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    (img.width(), img.height())
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
