#![allow(clippy::unwrap_used)]
// Integration tests for `CatalogClient` using wiremock.

use bytes::Bytes;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use stockroom_api::{CatalogClient, Error, FormField, FormValue, ProductBody, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CatalogClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = CatalogClient::new(&base, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_products() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "a1", "name": "RX-78", "price": 1290, "amount": 3 },
            { "id": 2, "name": "Zaku", "price": 890.5, "amount": 0 }
        ])))
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].primary_id, Some(json!("a1")));
    assert_eq!(products[1].id, Some(json!(2)));
    assert_eq!(products[1].price, Some(890.5));
}

#[tokio::test]
async fn test_list_tolerates_loosely_typed_records() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": 501, "name": "Numeric key", "price": 10, "amount": 1 },
            { "id": 2, "name": null, "price": "19.90", "amount": 1.5 }
        ])))
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].primary_id, Some(json!(501)));
    assert_eq!(products[1].name, "");
    assert_eq!(products[1].price, Some(19.9));
    assert_eq!(products[1].amount, Some(2));
}

#[tokio::test]
async fn test_get_product_not_found_is_status_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "message": "Product not found",
            "error": "Not Found"
        })))
        .mount(&server)
        .await;

    let err = client.get_product("missing").await.unwrap_err();
    match err {
        Error::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Product not found");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_messages_are_joined() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": ["name must be a string", "price must be a number"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let err = client
        .create_product(ProductBody::Json(json!({})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(
        err.to_string()
            .contains("name must be a string; price must be a number"),
        "unexpected message: {err}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.list_products().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_product_json() {
    let (server, client) = setup().await;

    let body = json!({ "name": "Gouf", "price": 990.0, "amount": 4 });

    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "new1", "name": "Gouf", "price": 990, "amount": 4
        })))
        .mount(&server)
        .await;

    let created = client.create_product(ProductBody::Json(body)).await.unwrap();
    assert_eq!(created.primary_id, Some(json!("new1")));
}

#[tokio::test]
async fn test_update_product_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/products/a1"))
        .and(header_exists("content-type"))
        .respond_with(|req: &Request| {
            let content_type = req
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            let body = String::from_utf8_lossy(&req.body).into_owned();
            let ok = content_type.starts_with("multipart/form-data")
                && body.contains("name=\"image\"; filename=\"rx78.png\"")
                && body.contains("name=\"name\"")
                && body.contains("RX-78-2");
            if ok {
                ResponseTemplate::new(200).set_body_json(json!({
                    "_id": "a1", "name": "RX-78-2", "price": 1290, "amount": 3,
                    "imageUrl": "/uploads/rx78.png"
                }))
            } else {
                ResponseTemplate::new(400)
            }
        })
        .mount(&server)
        .await;

    let fields = vec![
        FormField {
            name: "image",
            value: FormValue::File {
                file_name: "rx78.png".into(),
                content_type: "image/png".into(),
                bytes: Bytes::from_static(b"\x89PNG"),
            },
        },
        FormField::text("name", "RX-78-2"),
        FormField::text("_id", "a1"),
    ];

    let updated = client
        .update_product("a1", ProductBody::Multipart(fields))
        .await
        .unwrap();
    assert_eq!(updated.image_url.as_deref(), Some("/uploads/rx78.png"));
}

#[tokio::test]
async fn test_patch_product() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/products/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "Dom", "price": 1500, "amount": 1
        })))
        .mount(&server)
        .await;

    let patched = client
        .patch_product("7", ProductBody::Json(json!({ "amount": 1 })))
        .await
        .unwrap();
    assert_eq!(patched.amount, Some(1));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_with_outcome_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/products/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": false })))
        .mount(&server)
        .await;

    let outcome = client.delete_product("a1").await.unwrap();
    assert!(!outcome.deleted);
}

#[tokio::test]
async fn test_delete_with_document_body_counts_as_deleted() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/products/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "a1", "name": "RX-78"
        })))
        .mount(&server)
        .await;

    assert!(client.delete_product("a1").await.unwrap().deleted);
}

#[tokio::test]
async fn test_delete_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/products/a1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.delete_product("a1").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 1 on loopback.
    let client = CatalogClient::new("http://127.0.0.1:1/api", &TransportConfig::default()).unwrap();
    let err = client.list_products().await.unwrap_err();
    assert!(err.is_unreachable(), "expected unreachable, got: {err:?}");
}
