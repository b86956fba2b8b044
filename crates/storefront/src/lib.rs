//! RocketShoes Storefront library.
//!
//! Client-side cart state for the storefront: a [`CartStore`] that checks
//! stock against the catalog API before every change and mirrors the cart
//! into a local key-value store after every successful one.
//!
//! # Architecture
//!
//! - [`catalog`] - Read-only product and stock lookups (`reqwest` + `moka`)
//! - [`storage`] - Key-value persistence of the cart snapshot
//! - [`notify`] - User-facing notices for failed operations
//! - [`store`] - The cart state container
//!
//! The store is generic over its three collaborators and is constructed
//! explicitly by whatever owns it (the CLI, a UI shell, a test).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use catalog::{ApiClient, Catalog, CatalogError};
pub use config::{ApiConfig, CartConfig, ConfigError};
pub use error::CartError;
pub use notify::{Notice, NoticeQueue, Notifier, TracingNotifier};
pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, UpdateProductAmount};
