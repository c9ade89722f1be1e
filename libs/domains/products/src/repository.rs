//! Store traits behind the catalog services.
//!
//! Writes go through a [`UnitOfWork`] obtained from
//! [`CatalogRepository::begin`]; it is consumed by exactly one of
//! [`UnitOfWork::commit`] or [`UnitOfWork::rollback`]. Dropping it without
//! either discards the staged writes.

use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{
    InventoryRecord, LowStockAlert, NewInventoryRecord, NewProduct, Product, Warehouse,
};

#[async_trait]
pub trait ProductStore: Send {
    async fn find_by_sku(&mut self, sku: &str) -> ProductResult<Option<Product>>;

    /// Fails with `ProductError::Conflict` when the SKU is taken.
    async fn insert_product(&mut self, product: NewProduct) -> ProductResult<Product>;
}

#[async_trait]
pub trait WarehouseStore: Send {
    async fn find_warehouse(&mut self, id: i64) -> ProductResult<Option<Warehouse>>;
}

#[async_trait]
pub trait InventoryStore: Send {
    async fn insert_inventory(&mut self, record: NewInventoryRecord)
    -> ProductResult<InventoryRecord>;
}

/// The three stores bound to one transaction.
#[async_trait]
pub trait UnitOfWork: ProductStore + WarehouseStore + InventoryStore + Sized {
    async fn commit(self) -> ProductResult<()>;

    async fn rollback(self) -> ProductResult<()>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    type Tx: UnitOfWork;

    async fn begin(&self) -> ProductResult<Self::Tx>;
}

/// Read model for the low-stock report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertStore: Send + Sync + 'static {
    /// Inventory rows below threshold in the company's warehouses with at
    /// least one sale in the last 30 days, one row per linked supplier.
    async fn low_stock_alerts(&self, company_id: i64) -> ProductResult<Vec<LowStockAlert>>;
}
