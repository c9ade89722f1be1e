//! Products and low-stock alert routes

use axum::Router;
use domain_products::{
    LowStockAlertService, PgCatalogRepository, ProductCreationService, handlers,
};

use crate::state::AppState;

/// Create products router backed by PostgreSQL
pub fn router(state: &AppState) -> Router {
    let repository = PgCatalogRepository::new(state.db.clone());
    handlers::router(
        ProductCreationService::new(repository.clone()),
        LowStockAlertService::new(repository),
    )
}
