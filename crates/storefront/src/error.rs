//! Unified error handling for cart operations.
//!
//! Every failing store operation produces a `CartError` *and* delivers the
//! matching [`Notice`] to the user. The error is returned so callers can
//! react programmatically; it is never fatal.

use rocketshoes_core::{CartInvariantError, ProductId};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::notify::Notice;
use crate::storage::StorageError;

/// Error type for cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Product or stock lookup failed.
    #[error("Lookup failed: {0}")]
    Lookup(#[from] CatalogError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Not enough stock for the requested amount.
    #[error("Product {product_id} out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The change would have broken a cart invariant.
    #[error("Invalid cart change: {0}")]
    Invariant(#[from] CartInvariantError),
}

impl CartError {
    /// Notice to show for this error, given the operation's generic failure
    /// notice.
    #[must_use]
    pub const fn notice(&self, failure: Notice) -> Notice {
        match self {
            Self::OutOfStock { .. } => Notice::OutOfStock,
            Self::NotInCart(_) => Notice::RemoveFailed,
            Self::Lookup(_) | Self::Storage(_) | Self::Invariant(_) => failure,
        }
    }

    /// Whether this is an expected outcome of user input rather than a fault.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        match self {
            Self::OutOfStock { .. } | Self::NotInCart(_) => true,
            Self::Lookup(err) => err.is_not_found(),
            Self::Storage(_) | Self::Invariant(_) => false,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::OutOfStock {
            product_id: ProductId::new(3),
            requested: 4,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "Product 3 out of stock: requested 4, available 2"
        );

        let err = CartError::NotInCart(ProductId::new(8));
        assert_eq!(err.to_string(), "Product 8 is not in the cart");
    }

    #[test]
    fn test_cart_error_notices() {
        let out_of_stock = CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        assert_eq!(out_of_stock.notice(Notice::AddFailed), Notice::OutOfStock);

        let missing = CartError::NotInCart(ProductId::new(1));
        assert_eq!(missing.notice(Notice::RemoveFailed), Notice::RemoveFailed);

        let lookup = CartError::Lookup(CatalogError::NotFound("stock/1".to_string()));
        assert_eq!(lookup.notice(Notice::AddFailed), Notice::AddFailed);
        assert_eq!(lookup.notice(Notice::UpdateFailed), Notice::UpdateFailed);

        let storage = CartError::Storage(StorageError::Corrupt("bad".to_string()));
        assert_eq!(storage.notice(Notice::RemoveFailed), Notice::RemoveFailed);
    }

    #[test]
    fn test_expected_errors() {
        assert!(CartError::NotInCart(ProductId::new(1)).is_expected());
        assert!(CartError::Lookup(CatalogError::NotFound("products/1".to_string())).is_expected());
        assert!(
            !CartError::Lookup(CatalogError::Parse("eof".to_string())).is_expected()
        );
        assert!(!CartError::Storage(StorageError::Corrupt("bad".to_string())).is_expected());
    }
}
