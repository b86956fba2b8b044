//! Catalog API access: product details and stock levels.
//!
//! # Architecture
//!
//! - [`Catalog`] is the seam the cart store depends on
//! - [`ApiClient`] implements it over the REST API with `reqwest`
//! - Product details are cached in memory via `moka`; stock never is
//!
//! # Endpoints
//!
//! - `GET products/{id}` - product attributes
//! - `GET stock/{id}` - `{ "amount": n }`
//!
//! Both answer 404 for unknown products.

mod client;

use rocketshoes_core::{Product, ProductId, StockRecord};
use thiserror::Error;

pub use client::ApiClient;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned a non-success status other than 404.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configured API token cannot be sent as a header.
    #[error("Invalid API token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

impl CatalogError {
    /// Whether this is a plain "no such product" answer rather than a fault.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read-only product and stock lookups.
pub trait Catalog {
    /// Fetch product details.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Fetch the current stock level.
    fn stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockRecord, CatalogError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("products/7".to_string());
        assert_eq!(err.to_string(), "Not found: products/7");
        assert!(err.is_not_found());

        let err = CatalogError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
        assert!(!err.is_not_found());
    }
}
