//! The cart state container.
//!
//! [`CartStore`] owns the in-memory [`Cart`] and is the only thing allowed to
//! change it. Each operation runs to completion before the next one starts
//! (`&mut self`); the remote lookups are its only suspension points.
//!
//! Every change is applied to a copy of the cart, persisted, and only then
//! committed, so the in-memory cart and its snapshot never disagree. A
//! failure at any step leaves both untouched and delivers a [`Notice`].

use rocketshoes_core::{Cart, ProductId};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::Catalog;
use crate::error::{CartError, Result};
use crate::notify::{Notice, Notifier};
use crate::storage::{self, CartStorage};

/// Request to set the quantity of a product already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Target quantity; values of zero or less are ignored.
    pub amount: i64,
}

/// Cart state with stock-checked mutations and write-through persistence.
pub struct CartStore<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    cart: Cart,
}

impl<C, S, N> CartStore<C, S, N>
where
    C: Catalog,
    S: CartStorage,
    N: Notifier,
{
    /// Create a store, restoring the cart persisted in `storage`.
    ///
    /// A missing or malformed snapshot starts an empty cart.
    pub fn load(catalog: C, storage: S, notifier: N) -> Self {
        let cart = storage::load_cart(&storage);
        info!(items = cart.len(), "Cart store ready");
        Self {
            catalog,
            storage,
            notifier,
            cart,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Add one unit of a product.
    ///
    /// A new product is looked up and added with an amount of 1 if any stock
    /// is available; with no stock at all the call does nothing. A product
    /// already in the cart gains one unit if stock exceeds its current amount.
    ///
    /// # Errors
    ///
    /// Returns `CartError` (after notifying) if the lookup fails, stock is
    /// insufficient, or the cart cannot be saved. The cart is unchanged.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<()> {
        let next = self.next_cart_for_add(product_id).await;
        let result = match next {
            Ok(Some(next)) => self.commit(next),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        self.report(result, Notice::AddFailed)
    }

    /// Remove a product entirely.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` (after notifying) if the product is not
    /// in the cart, or `CartError::Storage` if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<()> {
        let mut next = self.cart.clone();
        let result = match next.remove(product_id) {
            Some(_) => self.commit(next),
            None => Err(CartError::NotInCart(product_id)),
        };
        self.report(result, Notice::RemoveFailed)
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Amounts of zero or less, and products not in the cart, are ignored
    /// without a lookup.
    ///
    /// # Errors
    ///
    /// Returns `CartError` (after notifying) if the stock lookup fails, stock
    /// does not cover the amount, or the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&mut self, update: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = update;

        if amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(());
        }
        if !self.cart.contains(product_id) {
            debug!("Ignoring update for product not in cart");
            return Ok(());
        }

        let requested = u32::try_from(amount).unwrap_or(u32::MAX);
        let next = self.next_cart_for_update(product_id, requested).await;
        let result = next.and_then(|next| self.commit(next));
        self.report(result, Notice::UpdateFailed)
    }

    /// `None` when a new product has no stock at all; nothing changes then.
    async fn next_cart_for_add(&self, product_id: ProductId) -> Result<Option<Cart>> {
        let mut next = self.cart.clone();

        if let Some(item) = self.cart.get(product_id) {
            let stock = self.catalog.stock(product_id).await?;
            let requested = item.amount.saturating_add(1);
            if stock.amount <= item.amount {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested,
                    available: stock.amount,
                });
            }
            next.set_amount(product_id, requested)?;
        } else {
            let product = self.catalog.product(product_id).await?;
            let stock = self.catalog.stock(product_id).await?;
            if !stock.in_stock() {
                debug!("New product has no stock, ignoring");
                return Ok(None);
            }
            next.push(product)?;
        }

        Ok(Some(next))
    }

    async fn next_cart_for_update(&self, product_id: ProductId, requested: u32) -> Result<Cart> {
        let stock = self.catalog.stock(product_id).await?;
        if !stock.covers(requested) {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        next.set_amount(product_id, requested)?;
        Ok(next)
    }

    /// Persist `next`, then make it the current cart.
    fn commit(&mut self, next: Cart) -> Result<()> {
        storage::save_cart(&self.storage, &next)?;
        self.cart = next;
        debug!(
            items = self.cart.len(),
            units = self.cart.item_count(),
            "Cart saved"
        );
        Ok(())
    }

    /// Log a failed operation and deliver its notice.
    fn report(&self, result: Result<()>, failure: Notice) -> Result<()> {
        if let Err(e) = &result {
            if e.is_expected() {
                warn!(error = %e, "Cart operation rejected");
            } else {
                error!(error = %e, "Cart operation failed");
            }
            self.notifier.notify(e.notice(failure));
        }
        result
    }
}
