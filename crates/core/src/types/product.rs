//! Catalog records returned by the backend API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Price, ProductId};

/// A product as described by the catalog (`GET products/{id}`).
///
/// Display attributes are carried through untouched; the cart only ever
/// looks at `id`. Attributes beyond the known ones are kept in `extra` and
/// written back out alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Any other attributes the catalog returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra attributes.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Price,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            extra: Map::new(),
        }
    }
}

/// Units available for a product (`GET stock/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Catalog product ID.
    pub id: ProductId,
    /// Units available remotely.
    pub amount: u32,
}

impl StockRecord {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.amount > 0
    }

    /// Whether `requested` units can be supplied.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        self.in_stock() && self.amount >= requested
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_api_json() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe-1.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_product_keeps_unknown_attributes() {
        let json = serde_json::json!({
            "id": 3,
            "title": "Tênis Adidas Duramo Lite 2.0",
            "price": 219.9,
            "image": "https://example.com/shoe-3.jpg",
            "brand": "Adidas",
            "sizes": [38, 39, 40]
        });

        let product: Product = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(product.extra["brand"], "Adidas");

        assert_eq!(serde_json::to_value(&product).unwrap(), json);
    }

    #[test]
    fn test_stock_rejects_negative_amount() {
        let result = serde_json::from_str::<StockRecord>(r#"{"id": 1, "amount": -2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_stock_covers() {
        let stock = StockRecord {
            id: ProductId::new(1),
            amount: 3,
        };
        assert!(stock.covers(3));
        assert!(!stock.covers(4));

        let empty = StockRecord {
            id: ProductId::new(1),
            amount: 0,
        };
        assert!(!empty.in_stock());
        assert!(!empty.covers(0));
    }
}
