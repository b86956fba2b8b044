//! The cart: an ordered list of products with requested quantities.
//!
//! # Invariants
//!
//! - At most one [`CartItem`] per [`ProductId`].
//! - Every item has an amount of at least 1.
//! - Insertion order is display order; updating an item never moves it.
//!
//! Both invariants are checked on deserialization, so a persisted snapshot
//! that violates them is rejected as a whole rather than partially loaded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, Product, ProductId};

/// A cart mutation or snapshot that would break a cart invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    #[error("product {0} is already in the cart")]
    DuplicateProduct(ProductId),
    #[error("product {0} has an amount of zero")]
    ZeroAmount(ProductId),
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// A product in the cart together with the quantity requested.
///
/// Serialized flat, as `{ id, title, price, image, amount }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartItem {
    /// Product ID of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price multiplied by amount.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.amount
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Find the item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Append a product with an amount of 1.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateProduct` if the product is already in the cart.
    pub fn push(&mut self, product: Product) -> Result<(), CartInvariantError> {
        if self.contains(product.id) {
            return Err(CartInvariantError::DuplicateProduct(product.id));
        }
        self.items.push(CartItem { product, amount: 1 });
        Ok(())
    }

    /// Replace the amount of an existing item, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` for an amount of 0 and `NotInCart` if the product
    /// has no item.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> Result<(), CartInvariantError> {
        if amount == 0 {
            return Err(CartInvariantError::ZeroAmount(id));
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(CartInvariantError::NotInCart(id))?;
        item.amount = amount;
        Ok(())
    }

    /// Remove the item for a product, returning it.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();
        for item in items {
            let id = item.id();
            if item.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(id));
            }
            if cart.contains(id) {
                return Err(CartInvariantError::DuplicateProduct(id));
            }
            cart.items.push(item);
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
