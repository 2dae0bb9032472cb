use thiserror::Error;

use super::{AuthError, ErrorKind, StoreError};

/// Sales recording and query errors
#[derive(Error, Debug)]
pub enum SaleError {
    #[error("productId, locationId, quantity are required")]
    MissingFields,

    #[error("quantity must be a number > 0")]
    InvalidQuantity,

    #[error("Invalid saleDate")]
    InvalidSaleDate,

    /// A query filter could not be parsed
    #[error("Invalid {field}: {value}")]
    InvalidFilter { field: &'static str, value: String },

    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error("Location {0} not found")]
    LocationNotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SaleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SaleError::MissingFields
            | SaleError::InvalidQuantity
            | SaleError::InvalidSaleDate
            | SaleError::InvalidFilter { .. } => ErrorKind::Validation,
            SaleError::ProductNotFound(_) | SaleError::LocationNotFound(_) => ErrorKind::NotFound,
            SaleError::Auth(err) => err.kind(),
            SaleError::Store(err) => err.kind(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Store)
    }
}
