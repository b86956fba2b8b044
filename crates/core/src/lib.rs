//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by the cart components:
//! - `storefront` - Cart state, catalog client and persistence
//! - `cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. Every invariant of a [`Cart`] is enforced here so that any
//! deserialized or mutated cart is valid by construction.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog records and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
