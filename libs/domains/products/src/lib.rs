//! Products Domain
//!
//! Product creation with initial per-warehouse inventory, and the per-company
//! low-stock report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, audit events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ordered validation, one transaction per request
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Store traits + PostgreSQL / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Requests, domain records, alerts
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, InMemoryCatalog, LowStockAlertService, ProductCreationService};
//!
//! let catalog = InMemoryCatalog::new();
//! let router = handlers::router(
//!     ProductCreationService::new(catalog.clone()),
//!     LowStockAlertService::new(catalog),
//! );
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{ErrorKind, ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use memory::{InMemoryCatalog, InMemoryUnitOfWork};
pub use models::{
    AlertSupplier, CreateProductRequest, DEFAULT_LOW_STOCK_THRESHOLD, InventoryRecord,
    LowStockAlert, LowStockReport, NewInventoryRecord, NewProduct, Product, ProductCreated,
    Warehouse, WarehouseAllocation, WarehouseEntry,
};
pub use postgres::{PgCatalogRepository, PgUnitOfWork};
pub use repository::{
    AlertStore, CatalogRepository, InventoryStore, ProductStore, UnitOfWork, WarehouseStore,
};
pub use service::{LowStockAlertService, ProductCreationService};
