//! Flatcart Core - Shared types library.
//!
//! This crate provides the domain types used by the Flatcart storefront:
//! product identifiers, prices, catalog records and the cart document with
//! its line-item invariants.
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no file
//! access, no HTTP. Persistence lives in the storefront crate's `store`
//! module, which loads a [`CartDocument`], applies one of the mutations
//! defined here, and writes it back.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices, plus cart and product records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
