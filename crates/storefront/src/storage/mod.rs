//! Key-value persistence for the cart snapshot.
//!
//! The cart is stored as a JSON array under [`CART_STORAGE_KEY`] and
//! rewritten in full after every change. Backends only need string get/set,
//! the same contract as browser local storage.

mod file;
mod memory;

use std::sync::Arc;

use rocketshoes_core::Cart;
use thiserror::Error;
use tracing::{debug, error, warn};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Namespaced key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing store exists but cannot be read as a key-value document.
    #[error("Corrupt storage: {0}")]
    Corrupt(String),
}

/// String key-value store.
pub trait CartStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: CartStorage> CartStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// Read the persisted cart.
///
/// Never fails: a missing, unreadable or malformed snapshot yields an empty
/// cart.
pub fn load_cart(storage: &impl CartStorage) -> Cart {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No persisted cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            error!(error = %e, "Failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => {
            debug!(items = cart.len(), "Loaded persisted cart");
            cart
        }
        Err(e) => {
            warn!(error = %e, "Persisted cart is malformed, starting empty");
            Cart::new()
        }
    }
}

/// Write the full cart snapshot.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the backend write fails.
pub fn save_cart(storage: &impl CartStorage, cart: &Cart) -> Result<(), StorageError> {
    let raw = serde_json::to_string(cart)?;
    storage.set_item(CART_STORAGE_KEY, &raw)
}
