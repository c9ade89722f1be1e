use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    EntityTrait, FromQueryResult, QueryFilter, Statement, TransactionTrait,
};

use crate::{
    entity::{inventory, product, warehouse},
    error::ProductResult,
    models::{
        AlertSupplier, InventoryRecord, LowStockAlert, NewInventoryRecord, NewProduct, Product,
        Warehouse, days_until_stockout,
    },
    repository::{
        AlertStore, CatalogRepository, InventoryStore, ProductStore, UnitOfWork, WarehouseStore,
    },
};

#[derive(Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    type Tx = PgUnitOfWork;

    async fn begin(&self) -> ProductResult<Self::Tx> {
        let txn = self.db.begin().await?;
        Ok(PgUnitOfWork { txn })
    }
}

/// Stores bound to one open `DatabaseTransaction`.
pub struct PgUnitOfWork {
    txn: DatabaseTransaction,
}

#[async_trait]
impl ProductStore for PgUnitOfWork {
    async fn find_by_sku(&mut self, sku: &str) -> ProductResult<Option<Product>> {
        let model = product::Entity::find()
            .filter(product::Column::Sku.eq(sku))
            .one(&self.txn)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn insert_product(&mut self, input: NewProduct) -> ProductResult<Product> {
        let model = product::ActiveModel::from(input).insert(&self.txn).await?;

        tracing::debug!(product_id = model.id, sku = %model.sku, "Inserted product");
        Ok(model.into())
    }
}

#[async_trait]
impl WarehouseStore for PgUnitOfWork {
    async fn find_warehouse(&mut self, id: i64) -> ProductResult<Option<Warehouse>> {
        let model = warehouse::Entity::find_by_id(id).one(&self.txn).await?;
        Ok(model.map(Into::into))
    }
}

#[async_trait]
impl InventoryStore for PgUnitOfWork {
    async fn insert_inventory(
        &mut self,
        record: NewInventoryRecord,
    ) -> ProductResult<InventoryRecord> {
        let model = inventory::ActiveModel::from(record).insert(&self.txn).await?;
        Ok(model.into())
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> ProductResult<()> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> ProductResult<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

const LOW_STOCK_SQL: &str = r#"
WITH recent_sales AS (
    SELECT product_id, warehouse_id, SUM(quantity)::BIGINT AS units_sold
    FROM sales
    WHERE sale_date >= NOW() - INTERVAL '30 days'
    GROUP BY product_id, warehouse_id
)
SELECT
    p.id AS product_id,
    p.name AS product_name,
    p.sku,
    w.id AS warehouse_id,
    w.name AS warehouse_name,
    i.quantity AS current_stock,
    p.low_stock_threshold AS threshold,
    rs.units_sold,
    s.id AS supplier_id,
    s.name AS supplier_name,
    s.contact_email
FROM products p
JOIN inventory i ON i.product_id = p.id
JOIN warehouses w ON w.id = i.warehouse_id
JOIN recent_sales rs ON rs.product_id = p.id AND rs.warehouse_id = w.id
LEFT JOIN supplier_products sp ON sp.product_id = p.id
LEFT JOIN suppliers s ON s.id = sp.supplier_id
WHERE w.company_id = $1
  AND i.quantity < p.low_stock_threshold
ORDER BY p.id, w.id, s.id
"#;

#[derive(Debug, FromQueryResult)]
struct LowStockRow {
    product_id: i64,
    product_name: String,
    sku: String,
    warehouse_id: i64,
    warehouse_name: String,
    current_stock: i32,
    threshold: i32,
    units_sold: i64,
    supplier_id: Option<i64>,
    supplier_name: Option<String>,
    contact_email: Option<String>,
}

impl From<LowStockRow> for LowStockAlert {
    fn from(row: LowStockRow) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            sku: row.sku,
            warehouse_id: row.warehouse_id,
            warehouse_name: row.warehouse_name,
            current_stock: row.current_stock,
            threshold: row.threshold,
            days_until_stockout: days_until_stockout(row.current_stock, row.units_sold),
            supplier: AlertSupplier {
                id: row.supplier_id,
                name: row.supplier_name,
                contact_email: row.contact_email,
            },
        }
    }
}

#[async_trait]
impl AlertStore for PgCatalogRepository {
    async fn low_stock_alerts(&self, company_id: i64) -> ProductResult<Vec<LowStockAlert>> {
        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, LOW_STOCK_SQL, [company_id.into()]);

        let rows = LowStockRow::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
