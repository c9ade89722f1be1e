//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for domain crates:
//! - `TestDatabase`: PostgreSQL container with the catalog schema applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `postgres` (default): Enables PostgreSQL test infrastructure
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let company_id = db.create_company(&builder.name("company", "main")).await;
//!     let sku = builder.sku("widget");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("warehouse", "main"), "test-warehouse-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Generate a SKU that fits the 64-character column
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(255);
    /// assert_eq!(builder.sku("widget"), "WIDGET-00000000000000FF");
    /// ```
    pub fn sku(&self, label: &str) -> String {
        format!("{}-{:016X}", label.to_uppercase(), self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    use serde_json::{Value, json};

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a JSON error body is exactly `{"error": message}`
    pub fn assert_error_message(body: &Value, message: &str) {
        assert_eq!(body, &json!({ "error": message }), "unexpected error body");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.sku("widget"), builder2.sku("widget"));
        assert_eq!(
            builder1.name("company", "test"),
            builder2.name("company", "test")
        );
    }

    #[test]
    fn test_data_builder_from_name() {
        let builder1 = TestDataBuilder::from_test_name("my_test");
        let builder2 = TestDataBuilder::from_test_name("my_test");

        assert_eq!(builder1.sku("widget"), builder2.sku("widget"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.sku("widget"), builder2.sku("widget"));
    }

    #[test]
    fn test_sku_fits_column() {
        let builder = TestDataBuilder::new(u64::MAX);
        assert!(builder.sku("a-fairly-long-product-label").len() <= 64);
    }

    #[test]
    fn test_assert_error_message() {
        let body = serde_json::json!({"error": "Invalid warehouse ID"});
        assertions::assert_error_message(&body, "Invalid warehouse ID");
    }

    #[test]
    #[should_panic(expected = "unexpected error body")]
    fn test_assert_error_message_rejects_extra_fields() {
        let body = serde_json::json!({"error": "Invalid warehouse ID", "code": 400});
        assertions::assert_error_message(&body, "Invalid warehouse ID");
    }
}
