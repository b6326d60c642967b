//! Core types for Flatcart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartDocument, CartDocumentError, LineItem, NotInCart};
pub use id::ProductId;
pub use price::Price;
pub use product::ProductRecord;
