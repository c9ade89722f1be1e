//! Request checks that need no store access.
//!
//! [`ProductDraft::from_request`] applies the presence, shape and price
//! rules in order and stops at the first failure. The per-entry parsers are
//! used by the service once it holds a unit of work.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProductRequest, DEFAULT_LOW_STOCK_THRESHOLD, NewProduct};

/// Largest amount a `NUMERIC(12,2)` column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// A request that passed every store-independent rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub product: NewProduct,
    /// Raw `warehouses` entries, checked against the store later
    pub entries: Vec<Value>,
}

impl ProductDraft {
    pub fn from_request(request: CreateProductRequest) -> ProductResult<Self> {
        let CreateProductRequest {
            name,
            sku,
            price,
            warehouses,
            low_stock_threshold,
        } = request;

        let name = name.and_then(non_empty_string);
        let sku = sku.and_then(non_empty_string);

        let (name, sku, price, warehouses) = match (name, sku, price, warehouses) {
            (Some(name), Some(sku), Some(price), Some(warehouses)) => {
                (name, sku, price, warehouses)
            }
            (name, sku, price, warehouses) => {
                let missing = [
                    ("name", name.is_none()),
                    ("sku", sku.is_none()),
                    ("price", price.is_none()),
                    ("warehouses", warehouses.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                return Err(ProductError::MissingFields(missing));
            }
        };

        let entries = match warehouses {
            Value::Array(entries) if !entries.is_empty() => entries,
            _ => return Err(ProductError::WarehousesNotList),
        };

        let price = parse_price(&price)?;
        let low_stock_threshold = parse_threshold(low_stock_threshold.as_ref())?;

        let product = NewProduct {
            name,
            sku,
            price,
            low_stock_threshold,
        };
        product
            .validate()
            .map_err(|e| ProductError::InvalidValue(e.to_string()))?;

        Ok(Self { product, entries })
    }
}

fn non_empty_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Parse a JSON number or numeric string and round half-up to cents.
pub fn parse_price(value: &Value) -> ProductResult<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(ProductError::InvalidValue(format!(
                "price must be a number, got {other}"
            )));
        }
    };

    let parsed = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| ProductError::InvalidValue(format!("price '{raw}' is not a number")))?;

    let mut price = parsed.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);

    if price <= Decimal::ZERO {
        return Err(ProductError::NonPositivePrice);
    }
    if price > MAX_PRICE {
        return Err(ProductError::InvalidValue(format!(
            "price {price} exceeds {MAX_PRICE}"
        )));
    }

    Ok(price)
}

fn parse_threshold(value: Option<&Value>) -> ProductResult<i32> {
    let Some(value) = value else {
        return Ok(DEFAULT_LOW_STOCK_THRESHOLD);
    };

    value
        .as_i64()
        .filter(|n| *n >= 0)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| {
            ProductError::InvalidValue(format!(
                "low_stock_threshold must be a non-negative integer, got {value}"
            ))
        })
}

/// Split a `warehouses` entry into its two required values.
pub fn entry_fields(entry: &Value) -> ProductResult<(&Value, &Value)> {
    let fields = entry.as_object().ok_or(ProductError::InvalidWarehouseEntry)?;

    match (fields.get("warehouse_id"), fields.get("initial_quantity")) {
        (Some(warehouse_id), Some(quantity)) => Ok((warehouse_id, quantity)),
        _ => Err(ProductError::InvalidWarehouseEntry),
    }
}

/// Integer or numeric string; anything else cannot name a warehouse.
pub fn parse_warehouse_id(value: &Value) -> ProductResult<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or(ProductError::UnknownWarehouse)
}

/// JSON integer `>= 0`. Floats, strings and booleans are rejected.
pub fn parse_quantity(value: &Value) -> ProductResult<i32> {
    let Value::Number(n) = value else {
        return Err(ProductError::InvalidQuantity);
    };

    match n.as_i64() {
        Some(q) if q < 0 => Err(ProductError::InvalidQuantity),
        Some(q) => i32::try_from(q).map_err(|_| {
            ProductError::InvalidValue(format!("initial_quantity {q} exceeds {}", i32::MAX))
        }),
        None if n.is_u64() => Err(ProductError::InvalidValue(format!(
            "initial_quantity {n} exceeds {}",
            i32::MAX
        ))),
        None => Err(ProductError::InvalidQuantity),
    }
}
