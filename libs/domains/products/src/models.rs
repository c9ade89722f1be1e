use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Threshold applied when a request does not set one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Body of `POST /products`, kept loosely typed so each rule can be
/// checked in order and reported with its own message.
///
/// Absent keys and JSON `null` both deserialize to `None`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateProductRequest {
    #[schema(value_type = Option<String>, example = "Widget")]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>, example = "WID-001")]
    pub sku: Option<Value>,
    /// JSON number or numeric string, rounded half-up to 2 decimals
    #[schema(value_type = Option<f64>, example = 9.99)]
    pub price: Option<Value>,
    #[schema(value_type = Option<Vec<WarehouseEntry>>)]
    pub warehouses: Option<Value>,
    #[schema(value_type = Option<i32>, example = 10)]
    pub low_stock_threshold: Option<Value>,
}

/// One element of `warehouses`, as documented for clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WarehouseEntry {
    pub warehouse_id: i64,
    pub initial_quantity: i64,
}

/// A product that passed every input rule and is ready to insert.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub low_stock_threshold: i32,
}

/// Validated quantity to seed at one warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarehouseAllocation {
    pub warehouse_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    #[schema(value_type = String, example = "10.00")]
    pub price: Decimal,
    pub low_stock_threshold: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewInventoryRecord {
    pub product_id: i64,
    pub warehouse_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InventoryRecord {
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: i64,
    pub quantity: i32,
}

/// Success body of `POST /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductCreated {
    #[schema(example = "Product created")]
    pub message: String,
    pub product_id: i64,
}

impl ProductCreated {
    pub fn new(product_id: i64) -> Self {
        Self {
            message: "Product created".to_string(),
            product_id,
        }
    }
}

/// Supplier to reorder from. Every field is null when the product has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AlertSupplier {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LowStockAlert {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub current_stock: i32,
    pub threshold: i32,
    /// `floor(current_stock / average daily sales over 30 days)`
    pub days_until_stockout: Option<i64>,
    pub supplier: AlertSupplier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LowStockReport {
    pub alerts: Vec<LowStockAlert>,
    pub total_alerts: usize,
}

impl From<Vec<LowStockAlert>> for LowStockReport {
    fn from(alerts: Vec<LowStockAlert>) -> Self {
        Self {
            total_alerts: alerts.len(),
            alerts,
        }
    }
}

/// Days of stock left at the current sales rate, `None` without sales.
pub fn days_until_stockout(current_stock: i32, units_sold_last_30_days: i64) -> Option<i64> {
    if units_sold_last_30_days <= 0 {
        return None;
    }
    // floor(stock / (sold / 30)) == floor(stock * 30 / sold) for positive sold
    Some((i64::from(current_stock) * 30).div_euclid(units_sold_last_30_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_treats_null_as_absent() {
        let req: CreateProductRequest =
            serde_json::from_value(json!({"name": null, "sku": "W-1"})).unwrap();
        assert!(req.name.is_none());
        assert_eq!(req.sku, Some(json!("W-1")));
        assert!(req.price.is_none());
    }

    #[test]
    fn test_days_until_stockout() {
        // 60 sold in 30 days is 2 per day
        assert_eq!(days_until_stockout(5, 60), Some(2));
        assert_eq!(days_until_stockout(0, 60), Some(0));
        assert_eq!(days_until_stockout(7, 0), None);
        // 1.5 per day
        assert_eq!(days_until_stockout(4, 45), Some(2));
    }

    #[test]
    fn test_report_counts_alerts() {
        let report = LowStockReport::from(Vec::new());
        assert_eq!(report.total_alerts, 0);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"alerts": [], "total_alerts": 0})
        );
    }

    #[test]
    fn test_new_product_rejects_overlong_sku() {
        let product = NewProduct {
            name: "Widget".into(),
            sku: "X".repeat(65),
            price: Decimal::new(1000, 2),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        };
        assert!(product.validate().is_err());
    }
}
