//! HTTP-level integration tests for the `/api/projects` endpoints.
//!
//! Requests go straight to the router through `tower::ServiceExt`, backed by
//! the in-memory store.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, data_uri_dimensions, delete, get, multipart_body, png_bytes,
    png_data_uri, post_json, post_multipart, put_json, put_multipart,
};
use serde_json::json;

const UNKNOWN_ID: &str = "65f1c0ffee00000000000001";

async fn create_project(app: axum::Router, name: &str) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/projects",
        json!({ "name": name, "description": "A description", "image": png_data_uri(20, 10) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_project_returns_201_with_mapped_document() {
    let app = common::memory_app();
    let json = create_project(app, "Villa").await;

    assert_eq!(json["name"], "Villa");
    assert_eq!(json["description"], "A description");

    let id = json["_id"].as_str().unwrap();
    assert_eq!(id.len(), 24);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let created_at = json["createdAt"].as_str().unwrap();
    assert!(created_at.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());

    assert_eq!(data_uri_dimensions(json["image"].as_str().unwrap()), (450, 350));
}

#[tokio::test]
async fn test_create_project_fields_in_document_order() {
    let app = common::memory_app();
    let json = create_project(app, "Ordered").await;

    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["_id", "name", "description", "image", "createdAt"]);
}

#[tokio::test]
async fn test_create_project_without_image_returns_400() {
    let app = common::memory_app();
    let response = post_json(
        app,
        "/api/projects",
        json!({ "name": "No image", "description": "d" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "error": "Image is required" }));
}

#[tokio::test]
async fn test_create_project_without_name_returns_400() {
    let app = common::memory_app();
    let response = post_json(
        app,
        "/api/projects",
        json!({ "description": "d", "image": png_data_uri(4, 4) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Name and description are required");
}

#[tokio::test]
async fn test_create_project_with_blank_description_returns_400() {
    let app = common::memory_app();
    let response = post_json(
        app,
        "/api/projects",
        json!({ "name": "n", "description": "   ", "image": png_data_uri(4, 4) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_project_with_corrupt_image_returns_400() {
    let app = common::memory_app();
    let response = post_json(
        app,
        "/api/projects",
        json!({ "name": "n", "description": "d", "image": "data:image/png;base64,AAAA" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid image"));
}

#[tokio::test]
async fn test_create_project_with_malformed_json_returns_400() {
    let app = common::memory_app();
    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/api/projects")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// Multipart uploads stored on disk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_multipart_upload_is_resized_and_served() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(
        common::memory_store(),
        common::disk_config(dir.path()),
    );

    let body = multipart_body(
        &[("name", "Tower"), ("description", "Tall")],
        Some(("photo.png", png_bytes(900, 100))),
    );
    let response = post_multipart(app.clone(), "/api/projects", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let image = json["image"].as_str().unwrap();
    let file_name = image.strip_prefix("/uploads/").unwrap();
    assert!(file_name.starts_with("cropped-") && file_name.ends_with(".png"));

    let stored = image::open(dir.path().join(file_name)).unwrap();
    assert_eq!((stored.width(), stored.height()), (450, 350));

    let served = get(app, image).await;
    assert_eq!(served.status(), StatusCode::OK);
    let bytes = body_bytes(served).await;
    assert_eq!(bytes, std::fs::read(dir.path().join(file_name)).unwrap());
}

#[tokio::test]
async fn test_multipart_upload_with_bad_extension_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(
        common::memory_store(),
        common::disk_config(dir.path()),
    );

    let body = multipart_body(
        &[("name", "n"), ("description", "d")],
        Some(("notes.txt", png_bytes(10, 10))),
    );
    let response = post_multipart(app, "/api/projects", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid image file");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_multipart_without_file_returns_400() {
    let app = common::memory_app();
    let body = multipart_body(&[("name", "n"), ("description", "d")], None);
    let response = post_multipart(app, "/api/projects", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Image is required");
}

#[tokio::test]
async fn test_multipart_update_with_empty_file_part_keeps_image() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Keep").await;
    let id = created["_id"].as_str().unwrap();

    let body = multipart_body(&[("description", "Changed")], Some(("", Vec::new())));
    let response = put_multipart(app, &format!("/api/projects/{id}"), body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["description"], "Changed");
    assert_eq!(json["image"], created["image"]);
}

#[tokio::test]
async fn test_create_project_with_empty_json_image_returns_image_required() {
    let app = common::memory_app();
    for image in ["", "data:application/octet-stream;base64,"] {
        let response = post_json(
            app.clone(),
            "/api/projects",
            json!({ "name": "n", "description": "d", "image": image }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Image is required" }));
    }
}

#[tokio::test]
async fn test_json_update_with_unselected_image_keeps_image() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Keep").await;
    let id = created["_id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/projects/{id}"),
        json!({
            "name": "renamed",
            "description": "d",
            "image": "data:application/octet-stream;base64,",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "renamed");
    assert_eq!(json["image"], created["image"]);
}

// ---------------------------------------------------------------------------
// Stored files follow the document
// ---------------------------------------------------------------------------

fn upload_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_replacing_image_removes_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(
        common::memory_store(),
        common::disk_config(dir.path()),
    );

    let body = multipart_body(
        &[("name", "Dock"), ("description", "d")],
        Some(("dock.png", png_bytes(50, 50))),
    );
    let created = body_json(post_multipart(app.clone(), "/api/projects", body).await).await;
    let old_file = created["image"].as_str().unwrap().strip_prefix("/uploads/").unwrap().to_string();
    assert_eq!(upload_files(dir.path()), vec![old_file.clone()]);

    let uri = format!("/api/projects/{}", created["_id"].as_str().unwrap());
    let body = multipart_body(&[], Some(("dock2.png", png_bytes(70, 20))));
    let response = put_multipart(app.clone(), &uri, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    let new_file = updated["image"].as_str().unwrap().strip_prefix("/uploads/").unwrap().to_string();
    assert_ne!(new_file, old_file);
    assert_eq!(upload_files(dir.path()), vec![new_file]);

    let response = delete(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(upload_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_update_of_missing_project_stores_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(
        common::memory_store(),
        common::disk_config(dir.path()),
    );

    let body = multipart_body(&[], Some(("ghost.png", png_bytes(10, 10))));
    let response = put_multipart(app, &format!("/api/projects/{UNKNOWN_ID}"), body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(upload_files(dir.path()).is_empty());
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_projects_newest_first() {
    let app = common::memory_app();

    let empty = get(app.clone(), "/api/projects").await;
    assert_eq!(empty.status(), StatusCode::OK);
    assert_eq!(body_json(empty).await, json!([]));

    create_project(app.clone(), "First").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    create_project(app.clone(), "Second").await;

    let response = get(app, "/api/projects").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_get_project_round_trips_created_document() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Round trip").await;
    let id = created["_id"].as_str().unwrap();

    let response = get(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn test_get_nonexistent_project_returns_404() {
    let app = common::memory_app();
    let response = get(app, &format!("/api/projects/{UNKNOWN_ID}")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "error": "Project not found" }));
}

#[tokio::test]
async fn test_get_project_with_malformed_id_returns_400() {
    let app = common::memory_app();
    let response = get(app, "/api/projects/not-an-id").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid project id");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_project_changes_only_given_fields() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Original").await;
    let id = created["_id"].as_str().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/projects/{id}"),
        json!({ "name": "Updated" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Updated");
    assert_eq!(json["description"], created["description"]);
    assert_eq!(json["image"], created["image"]);
    assert_eq!(json["createdAt"], created["createdAt"]);

    let fetched = body_json(get(app, &format!("/api/projects/{id}")).await).await;
    assert_eq!(fetched, json);
}

#[tokio::test]
async fn test_update_project_image_is_renormalized() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Picture").await;
    let id = created["_id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/projects/{id}"),
        json!({ "image": png_data_uri(1000, 1000) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(data_uri_dimensions(json["image"].as_str().unwrap()), (450, 350));
}

#[tokio::test]
async fn test_update_project_with_no_fields_returns_unchanged_document() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Untouched").await;
    let id = created["_id"].as_str().unwrap();

    let response = put_json(app, &format!("/api/projects/{id}"), json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn test_update_project_with_empty_name_returns_400() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Named").await;
    let id = created["_id"].as_str().unwrap();

    let response = put_json(app, &format!("/api/projects/{id}"), json!({ "name": "" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "name must not be empty");
}

#[tokio::test]
async fn test_update_nonexistent_project_returns_404() {
    let app = common::memory_app();
    let response = put_json(
        app,
        &format!("/api/projects/{UNKNOWN_ID}"),
        json!({ "name": "Ghost" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_project_then_second_delete_returns_404() {
    let app = common::memory_app();
    let created = create_project(app.clone(), "Doomed").await;
    let uri = format!("/api/projects/{}", created["_id"].as_str().unwrap());

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "message": "Project deleted successfully" }));

    let again = delete(app.clone(), &uri).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let gone = get(app, &uri).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_project_with_malformed_id_returns_400() {
    let app = common::memory_app();
    let response = delete(app, "/api/projects/xyz").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Body limit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_oversized_body_returns_413() {
    let config = atelier_api::config::ServerConfig {
        max_upload_bytes: 1024,
        ..common::test_config()
    };
    let app = common::build_test_app_with_config(common::memory_store(), config);

    let body = multipart_body(
        &[("name", "n"), ("description", "d")],
        Some(("big.png", vec![0u8; 4096])),
    );
    let response = post_multipart(app, "/api/projects", body).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
