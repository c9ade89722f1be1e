use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProductRequest, LowStockReport, NewInventoryRecord, Product, ProductCreated,
    WarehouseAllocation,
};
use crate::repository::{
    AlertStore, CatalogRepository, InventoryStore, ProductStore, UnitOfWork, WarehouseStore,
};
use crate::validation::{ProductDraft, entry_fields, parse_quantity, parse_warehouse_id};

/// Creates a product and its initial inventory in one transaction.
#[derive(Clone)]
pub struct ProductCreationService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> ProductCreationService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate `request` and persist the product plus one inventory row per
    /// warehouse entry.
    ///
    /// Store-independent rules run before a transaction is opened. The SKU
    /// and warehouse rules run inside it, before the first write. Any error
    /// after `begin` rolls the transaction back; success commits exactly once.
    #[instrument(skip(self, request))]
    pub async fn create_product(&self, request: CreateProductRequest) -> ProductResult<ProductCreated> {
        let draft = ProductDraft::from_request(request)?;
        let sku = draft.product.sku.clone();

        let mut tx = self.repository.begin().await?;

        match Self::write(&mut tx, draft).await {
            Ok(product) => {
                tx.commit().await?;
                info!(product_id = product.id, %sku, "Created product");
                Ok(ProductCreated::new(product.id))
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, %sku, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn write(tx: &mut R::Tx, draft: ProductDraft) -> ProductResult<Product> {
        if tx.find_by_sku(&draft.product.sku).await?.is_some() {
            return Err(ProductError::DuplicateSku);
        }

        let allocations = Self::allocations(tx, &draft).await?;

        let product = tx.insert_product(draft.product).await?;
        for allocation in allocations {
            tx.insert_inventory(NewInventoryRecord {
                product_id: product.id,
                warehouse_id: allocation.warehouse_id,
                quantity: allocation.quantity,
            })
            .await?;
        }

        debug!(
            product_id = product.id,
            warehouses = draft.entries.len(),
            "Staged product and inventory"
        );
        Ok(product)
    }

    /// Check each `warehouses` entry in order: shape, then existence, then
    /// quantity. A warehouse listed twice is an invalid entry.
    async fn allocations(
        tx: &mut R::Tx,
        draft: &ProductDraft,
    ) -> ProductResult<Vec<WarehouseAllocation>> {
        let mut seen = HashSet::with_capacity(draft.entries.len());
        let mut allocations = Vec::with_capacity(draft.entries.len());

        for entry in &draft.entries {
            let (raw_warehouse_id, raw_quantity) = entry_fields(entry)?;
            let warehouse_id = parse_warehouse_id(raw_warehouse_id)?;

            if !seen.insert(warehouse_id) {
                return Err(ProductError::InvalidWarehouseEntry);
            }
            if tx.find_warehouse(warehouse_id).await?.is_none() {
                return Err(ProductError::UnknownWarehouse);
            }

            let quantity = parse_quantity(raw_quantity)?;
            allocations.push(WarehouseAllocation {
                warehouse_id,
                quantity,
            });
        }

        Ok(allocations)
    }
}

/// Builds the per-company low-stock report.
#[derive(Clone)]
pub struct LowStockAlertService<A: AlertStore> {
    store: Arc<A>,
}

impl<A: AlertStore> LowStockAlertService<A> {
    pub fn new(store: A) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    #[instrument(skip(self))]
    pub async fn low_stock_alerts(&self, company_id: i64) -> ProductResult<LowStockReport> {
        let alerts = self.store.low_stock_alerts(company_id).await?;
        debug!(count = alerts.len(), "Computed low-stock alerts");
        Ok(LowStockReport::from(alerts))
    }
}
