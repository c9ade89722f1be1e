//! HTTP handlers for the catalog API

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::HeaderMap,
    routing::{get, post},
};
use axum_helpers::{AuditEvent, AuditOutcome, CallerIdentity, ErrorBody};
use serde_json::{Value, json};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    AlertSupplier, CreateProductRequest, LowStockAlert, LowStockReport, ProductCreated,
    WarehouseEntry,
};
use crate::repository::{AlertStore, CatalogRepository};
use crate::service::{LowStockAlertService, ProductCreationService};

pub const PRODUCTS_TAG: &str = "Products";
pub const ALERTS_TAG: &str = "Alerts";

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(create_product, low_stock_alerts),
    components(schemas(
        CreateProductRequest,
        WarehouseEntry,
        ProductCreated,
        LowStockReport,
        LowStockAlert,
        AlertSupplier,
        ErrorBody
    )),
    tags(
        (name = PRODUCTS_TAG, description = "Product creation with initial inventory"),
        (name = ALERTS_TAG, description = "Per-company low-stock reporting")
    )
)]
pub struct ApiDoc;

/// Routes:
/// - `POST /products`
/// - `GET /companies/{company_id}/alerts/low-stock`
pub fn router<R, A>(products: ProductCreationService<R>, alerts: LowStockAlertService<A>) -> Router
where
    R: CatalogRepository,
    A: AlertStore,
{
    let products_routes = Router::new()
        .route("/products", post(create_product::<R>))
        .with_state(Arc::new(products));

    let alert_routes = Router::new()
        .route(
            "/companies/{company_id}/alerts/low-stock",
            get(low_stock_alerts::<A>),
        )
        .with_state(Arc::new(alerts));

    products_routes.merge(alert_routes)
}

/// Create a product and seed its inventory
#[utoipa::path(
    post,
    path = "/products",
    tag = PRODUCTS_TAG,
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ProductCreated),
        (status = 400, description = "Request rejected; nothing was written", body = ErrorBody),
        (status = 500, description = "Integrity violation or internal failure", body = ErrorBody)
    )
)]
async fn create_product<R: CatalogRepository>(
    State(service): State<Arc<ProductCreationService<R>>>,
    caller: CallerIdentity,
    headers: HeaderMap,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ProductResult<Json<ProductCreated>> {
    let (sku, result) = match payload {
        Ok(Json(request)) => {
            let sku = request
                .sku
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string);
            (sku, service.create_product(request).await)
        }
        Err(rejection) => (None, Err(ProductError::InvalidValue(rejection.body_text()))),
    };

    match &result {
        Ok(created) => AuditEvent::new(
            caller.0,
            "product.create",
            Some(format!("product:{}", created.product_id)),
            AuditOutcome::Success,
        )
        .with_request_headers(&headers)
        .with_details(json!({ "sku": sku }))
        .log(),
        Err(err) => AuditEvent::new(
            caller.0,
            "product.create",
            sku.as_ref().map(|s| format!("sku:{s}")),
            AuditOutcome::Failure,
        )
        .with_request_headers(&headers)
        .with_details(json!({ "kind": err.kind().to_string(), "error": err.to_string() }))
        .log(),
    }

    result.map(Json)
}

/// Low-stock alerts for one company
#[utoipa::path(
    get,
    path = "/companies/{company_id}/alerts/low-stock",
    tag = ALERTS_TAG,
    params(
        ("company_id" = i64, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Products below their low-stock threshold", body = LowStockReport),
        (status = 400, description = "Malformed company ID", body = ErrorBody),
        (status = 500, description = "Internal failure", body = ErrorBody)
    )
)]
async fn low_stock_alerts<A: AlertStore>(
    State(service): State<Arc<LowStockAlertService<A>>>,
    company_id: Result<Path<i64>, PathRejection>,
) -> ProductResult<Json<LowStockReport>> {
    let Path(company_id) =
        company_id.map_err(|rejection| ProductError::InvalidValue(rejection.body_text()))?;

    let report = service.low_stock_alerts(company_id).await?;
    Ok(Json(report))
}
