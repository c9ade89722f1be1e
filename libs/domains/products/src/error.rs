use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::ErrorBody;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Coarse classification of a [`ProductError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Caller input rejected, nothing was written
    Validation,
    /// Uniqueness or integrity race lost at write time
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("warehouses must be a non-empty list")]
    WarehousesNotList,

    #[error("Price must be greater than 0")]
    NonPositivePrice,

    #[error("SKU already exists")]
    DuplicateSku,

    #[error("Invalid warehouse entry")]
    InvalidWarehouseEntry,

    #[error("Invalid warehouse ID")]
    UnknownWarehouse,

    #[error("Initial quantity must be a non-negative")]
    InvalidQuantity,

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Database integrity error: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProductError::MissingFields(_)
            | ProductError::WarehousesNotList
            | ProductError::NonPositivePrice
            | ProductError::DuplicateSku
            | ProductError::InvalidWarehouseEntry
            | ProductError::UnknownWarehouse
            | ProductError::InvalidQuantity
            | ProductError::InvalidValue(_) => ErrorKind::Validation,
            ProductError::Conflict(_) => ErrorKind::Conflict,
            ProductError::Database(_) | ProductError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Unique and foreign-key violations become [`ProductError::Conflict`];
/// anything else is an internal database failure.
impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
            | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => ProductError::Conflict(detail),
            _ => ProductError::Database(err.to_string()),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Validation => tracing::info!(error = %self, "request rejected"),
            ErrorKind::Conflict => tracing::warn!(error = %self, "integrity violation"),
            ErrorKind::Internal => tracing::error!(error = %self, "request failed"),
        }

        ErrorBody::new(self.public_message()).into_response_with(self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_in_order() {
        let err = ProductError::MissingFields(vec!["sku", "price"]);
        assert_eq!(err.to_string(), "Missing required fields: sku, price");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_is_500_with_detail() {
        let err = ProductError::Conflict("duplicate key value violates unique constraint".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.public_message(),
            "Database integrity error: duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ProductError::Database("connection refused".into());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_generic_db_error_maps_to_internal() {
        let err: ProductError = DbErr::Custom("pool timed out".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Conflict.to_string(), "conflict");
    }
}
