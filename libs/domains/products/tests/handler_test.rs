//! Handler tests for the products domain
//!
//! Drive the domain router with `oneshot` against the in-memory catalog:
//! - JSON bodies in and out
//! - status codes and `{"error": ...}` messages
//! - nothing persisted on rejected requests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use test_utils::assertions::{assert_error_message, assert_some};
use tower::ServiceExt;

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_warehouses([
        Warehouse {
            id: 1,
            name: "Main".into(),
            company_id: 1,
        },
        Warehouse {
            id: 2,
            name: "Overflow".into(),
            company_id: 1,
        },
    ])
    .await
}

fn app(catalog: &InMemoryCatalog) -> Router {
    handlers::router(
        ProductCreationService::new(catalog.clone()),
        LowStockAlertService::new(catalog.clone()),
    )
}

fn post_product(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/products")
        .header("content-type", "application/json")
        .header("x-authenticated-user", "catalog-admin")
        .body(body.into())
        .unwrap()
}

async fn post_json(app: Router, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(post_product(serde_json::to_string(&payload).unwrap()))
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

fn widget() -> Value {
    json!({
        "name": "Widget",
        "sku": "W-1",
        "price": 9.999,
        "warehouses": [{"warehouse_id": 1, "initial_quantity": 10}]
    })
}

#[tokio::test]
async fn test_create_product_returns_200_with_id() {
    let catalog = catalog().await;

    let (status, body) = post_json(app(&catalog), widget()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product created");
    let product = assert_some(catalog.product_by_sku("W-1").await, "created product");
    assert_eq!(body["product_id"], product.id);
    assert_eq!(product.price.to_string(), "10.00");
}

#[tokio::test]
async fn test_missing_fields_returns_400() {
    let catalog = catalog().await;

    let (status, body) = post_json(app(&catalog), json!({"name": "Widget"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_message(&body, "Missing required fields: sku, price, warehouses");
}

#[tokio::test]
async fn test_rule_messages() {
    let cases = [
        (
            json!({"name": "W", "sku": "S", "price": 1, "warehouses": []}),
            "warehouses must be a non-empty list",
        ),
        (
            json!({"name": "W", "sku": "S", "price": -1,
                   "warehouses": [{"warehouse_id": 1, "initial_quantity": 1}]}),
            "Price must be greater than 0",
        ),
        (
            json!({"name": "W", "sku": "S", "price": 1, "warehouses": [5]}),
            "Invalid warehouse entry",
        ),
        (
            json!({"name": "W", "sku": "S", "price": 1,
                   "warehouses": [{"warehouse_id": 999, "initial_quantity": 1}]}),
            "Invalid warehouse ID",
        ),
        (
            json!({"name": "W", "sku": "S", "price": 1,
                   "warehouses": [{"warehouse_id": 1, "initial_quantity": -4}]}),
            "Initial quantity must be a non-negative",
        ),
        (
            json!({"name": "W", "sku": "S", "price": "free",
                   "warehouses": [{"warehouse_id": 1, "initial_quantity": 1}]}),
            "Invalid value: price 'free' is not a number",
        ),
    ];

    for (payload, message) in cases {
        let catalog = catalog().await;
        let (status, body) = post_json(app(&catalog), payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_error_message(&body, message);
        assert!(catalog.products().await.is_empty());
        assert!(catalog.inventory().await.is_empty());
    }
}

#[tokio::test]
async fn test_duplicate_sku_returns_400() {
    let catalog = catalog().await;

    let (first, _) = post_json(app(&catalog), widget()).await;
    let (second, body) = post_json(app(&catalog), widget()).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_error_message(&body, "SKU already exists");
    assert_eq!(catalog.products().await.len(), 1);
}

#[tokio::test]
async fn test_partial_unknown_warehouse_writes_nothing() {
    let catalog = catalog().await;

    let (status, body) = post_json(
        app(&catalog),
        json!({
            "name": "Widget",
            "sku": "W-1",
            "price": 5,
            "warehouses": [
                {"warehouse_id": 1, "initial_quantity": 10},
                {"warehouse_id": 999, "initial_quantity": 10}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_message(&body, "Invalid warehouse ID");
    assert!(catalog.products().await.is_empty());
    assert!(catalog.inventory().await.is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_invalid_value() {
    let catalog = catalog().await;

    let response = app(&catalog)
        .oneshot(post_product("{\"name\": \"Widget\","))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid value: "));
}

#[tokio::test]
async fn test_low_stock_alerts_endpoint() {
    let catalog = catalog().await;
    let (status, body) = post_json(
        app(&catalog),
        json!({
            "name": "Widget",
            "sku": "W-1",
            "price": 5,
            "low_stock_threshold": 20,
            "warehouses": [{"warehouse_id": 1, "initial_quantity": 5}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let product_id = body["product_id"].as_i64().unwrap();

    catalog
        .record_sale(product_id, 1, 30, Utc::now() - Duration::days(1))
        .await;
    catalog.add_supplier(3, "Supplier Corp", Some("orders@supplier.test")).await;
    catalog.link_supplier(3, product_id).await;

    let response = app(&catalog)
        .oneshot(
            Request::builder()
                .uri("/companies/1/alerts/low-stock")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["total_alerts"], 1);
    assert_eq!(
        body["alerts"][0],
        json!({
            "product_id": product_id,
            "product_name": "Widget",
            "sku": "W-1",
            "warehouse_id": 1,
            "warehouse_name": "Main",
            "current_stock": 5,
            "threshold": 20,
            "days_until_stockout": 5,
            "supplier": {
                "id": 3,
                "name": "Supplier Corp",
                "contact_email": "orders@supplier.test"
            }
        })
    );
}

#[tokio::test]
async fn test_low_stock_alerts_rejects_non_numeric_company() {
    let catalog = catalog().await;

    let response = app(&catalog)
        .oneshot(
            Request::builder()
                .uri("/companies/acme/alerts/low-stock")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid value: "));
}
