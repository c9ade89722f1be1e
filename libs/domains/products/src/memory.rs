//! In-memory catalog for development and tests.
//!
//! A transaction stages its writes privately and applies them under the
//! write lock on commit, re-checking the SKU and (product, warehouse)
//! uniqueness there. A lost race surfaces as `ProductError::Conflict`, the
//! same way a unique index violation does in PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    AlertSupplier, InventoryRecord, LowStockAlert, NewInventoryRecord, NewProduct, Product,
    Warehouse, days_until_stockout,
};
use crate::repository::{
    AlertStore, CatalogRepository, InventoryStore, ProductStore, UnitOfWork, WarehouseStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Supplier {
    id: i64,
    name: String,
    contact_email: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Sale {
    product_id: i64,
    warehouse_id: i64,
    quantity: i64,
    sold_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: BTreeMap<i64, Product>,
    warehouses: HashMap<i64, Warehouse>,
    inventory: Vec<InventoryRecord>,
    suppliers: BTreeMap<i64, Supplier>,
    supplier_products: Vec<(i64, i64)>,
    sales: Vec<Sale>,
    next_product_id: i64,
    next_inventory_id: i64,
}

impl CatalogState {
    fn allocate_product_id(&mut self) -> i64 {
        self.next_product_id += 1;
        self.next_product_id
    }

    fn allocate_inventory_id(&mut self) -> i64 {
        self.next_inventory_id += 1;
        self.next_inventory_id
    }

    fn sku_taken(&self, sku: &str) -> bool {
        self.products.values().any(|p| p.sku == sku)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-loaded with the given warehouses.
    pub async fn with_warehouses(warehouses: impl IntoIterator<Item = Warehouse>) -> Self {
        let catalog = Self::new();
        for warehouse in warehouses {
            catalog.add_warehouse(warehouse).await;
        }
        catalog
    }

    pub async fn add_warehouse(&self, warehouse: Warehouse) {
        self.state
            .write()
            .await
            .warehouses
            .insert(warehouse.id, warehouse);
    }

    pub async fn add_supplier(&self, id: i64, name: &str, contact_email: Option<&str>) {
        self.state.write().await.suppliers.insert(
            id,
            Supplier {
                id,
                name: name.to_string(),
                contact_email: contact_email.map(str::to_string),
            },
        );
    }

    pub async fn link_supplier(&self, supplier_id: i64, product_id: i64) {
        self.state
            .write()
            .await
            .supplier_products
            .push((supplier_id, product_id));
    }

    pub async fn record_sale(
        &self,
        product_id: i64,
        warehouse_id: i64,
        quantity: i64,
        sold_at: DateTime<Utc>,
    ) {
        self.state.write().await.sales.push(Sale {
            product_id,
            warehouse_id,
            quantity,
            sold_at,
        });
    }

    /// Overwrite the stored quantity of an existing inventory row.
    pub async fn set_quantity(&self, product_id: i64, warehouse_id: i64, quantity: i32) -> bool {
        let mut state = self.state.write().await;
        match state
            .inventory
            .iter_mut()
            .find(|r| r.product_id == product_id && r.warehouse_id == warehouse_id)
        {
            Some(record) => {
                record.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.values().cloned().collect()
    }

    pub async fn product_by_sku(&self, sku: &str) -> Option<Product> {
        self.state
            .read()
            .await
            .products
            .values()
            .find(|p| p.sku == sku)
            .cloned()
    }

    pub async fn inventory(&self) -> Vec<InventoryRecord> {
        self.state.read().await.inventory.clone()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    type Tx = InMemoryUnitOfWork;

    async fn begin(&self) -> ProductResult<Self::Tx> {
        Ok(InMemoryUnitOfWork {
            state: Arc::clone(&self.state),
            products: Vec::new(),
            inventory: Vec::new(),
        })
    }
}

/// Writes staged by one transaction, invisible to others until commit.
pub struct InMemoryUnitOfWork {
    state: Arc<RwLock<CatalogState>>,
    products: Vec<Product>,
    inventory: Vec<InventoryRecord>,
}

#[async_trait]
impl ProductStore for InMemoryUnitOfWork {
    async fn find_by_sku(&mut self, sku: &str) -> ProductResult<Option<Product>> {
        if let Some(staged) = self.products.iter().find(|p| p.sku == sku) {
            return Ok(Some(staged.clone()));
        }

        let state = self.state.read().await;
        Ok(state.products.values().find(|p| p.sku == sku).cloned())
    }

    async fn insert_product(&mut self, product: NewProduct) -> ProductResult<Product> {
        if self.products.iter().any(|p| p.sku == product.sku) {
            return Err(sku_conflict(&product.sku));
        }

        let id = self.state.write().await.allocate_product_id();
        let product = Product {
            id,
            name: product.name,
            sku: product.sku,
            price: product.price,
            low_stock_threshold: product.low_stock_threshold,
        };
        self.products.push(product.clone());
        Ok(product)
    }
}

#[async_trait]
impl WarehouseStore for InMemoryUnitOfWork {
    async fn find_warehouse(&mut self, id: i64) -> ProductResult<Option<Warehouse>> {
        Ok(self.state.read().await.warehouses.get(&id).cloned())
    }
}

#[async_trait]
impl InventoryStore for InMemoryUnitOfWork {
    async fn insert_inventory(
        &mut self,
        record: NewInventoryRecord,
    ) -> ProductResult<InventoryRecord> {
        if self
            .inventory
            .iter()
            .any(|r| r.product_id == record.product_id && r.warehouse_id == record.warehouse_id)
        {
            return Err(inventory_conflict(record.product_id, record.warehouse_id));
        }

        let id = self.state.write().await.allocate_inventory_id();
        let record = InventoryRecord {
            id,
            product_id: record.product_id,
            warehouse_id: record.warehouse_id,
            quantity: record.quantity,
        };
        self.inventory.push(record);
        Ok(record)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self) -> ProductResult<()> {
        let mut state = self.state.write().await;

        for product in &self.products {
            if state.sku_taken(&product.sku) {
                return Err(sku_conflict(&product.sku));
            }
        }

        let staged_ids: HashSet<i64> = self.products.iter().map(|p| p.id).collect();
        for record in &self.inventory {
            if !state.warehouses.contains_key(&record.warehouse_id) {
                return Err(ProductError::Conflict(format!(
                    "Key (warehouse_id)=({}) is not present in table \"warehouses\"",
                    record.warehouse_id
                )));
            }
            if !staged_ids.contains(&record.product_id)
                && !state.products.contains_key(&record.product_id)
            {
                return Err(ProductError::Conflict(format!(
                    "Key (product_id)=({}) is not present in table \"products\"",
                    record.product_id
                )));
            }
            if state
                .inventory
                .iter()
                .any(|r| r.product_id == record.product_id && r.warehouse_id == record.warehouse_id)
            {
                return Err(inventory_conflict(record.product_id, record.warehouse_id));
            }
        }

        for product in self.products {
            state.products.insert(product.id, product);
        }
        state.inventory.extend(self.inventory);
        Ok(())
    }

    async fn rollback(self) -> ProductResult<()> {
        Ok(())
    }
}

fn sku_conflict(sku: &str) -> ProductError {
    ProductError::Conflict(format!("Key (sku)=({sku}) already exists"))
}

fn inventory_conflict(product_id: i64, warehouse_id: i64) -> ProductError {
    ProductError::Conflict(format!(
        "Key (product_id, warehouse_id)=({product_id}, {warehouse_id}) already exists"
    ))
}

#[async_trait]
impl AlertStore for InMemoryCatalog {
    async fn low_stock_alerts(&self, company_id: i64) -> ProductResult<Vec<LowStockAlert>> {
        let state = self.state.read().await;
        let window_start = Utc::now() - Duration::days(30);

        let mut recent: HashMap<(i64, i64), i64> = HashMap::new();
        for sale in state.sales.iter().filter(|s| s.sold_at >= window_start) {
            *recent.entry((sale.product_id, sale.warehouse_id)).or_default() += sale.quantity;
        }

        let mut alerts = Vec::new();
        for record in &state.inventory {
            let Some(warehouse) = state.warehouses.get(&record.warehouse_id) else {
                continue;
            };
            let Some(product) = state.products.get(&record.product_id) else {
                continue;
            };
            let Some(&units_sold) = recent.get(&(record.product_id, record.warehouse_id)) else {
                continue;
            };
            if warehouse.company_id != company_id || record.quantity >= product.low_stock_threshold
            {
                continue;
            }

            let mut suppliers: Vec<AlertSupplier> = state
                .supplier_products
                .iter()
                .filter(|(_, product_id)| *product_id == product.id)
                .filter_map(|(supplier_id, _)| state.suppliers.get(supplier_id))
                .map(|s| AlertSupplier {
                    id: Some(s.id),
                    name: Some(s.name.clone()),
                    contact_email: s.contact_email.clone(),
                })
                .collect();
            if suppliers.is_empty() {
                suppliers.push(AlertSupplier::default());
            }

            for supplier in suppliers {
                alerts.push(LowStockAlert {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    sku: product.sku.clone(),
                    warehouse_id: warehouse.id,
                    warehouse_name: warehouse.name.clone(),
                    current_stock: record.quantity,
                    threshold: product.low_stock_threshold,
                    days_until_stockout: days_until_stockout(record.quantity, units_sold),
                    supplier,
                });
            }
        }

        alerts.sort_by_key(|a| (a.product_id, a.warehouse_id, a.supplier.id));
        Ok(alerts)
    }
}
