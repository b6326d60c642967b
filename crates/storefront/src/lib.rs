//! Flatcart Storefront library.
//!
//! A small storefront whose cart and product catalog live in JSON files.
//! This crate provides the storefront functionality as a library, allowing
//! it to be tested and reused; `main.rs` only wires up tracing, Sentry and
//! the listener.
//!
//! # Modules
//!
//! - [`store`] - Loads and atomically saves JSON documents, with per-file write locks
//! - [`cart`] - Cart mutations as load, mutate, save cycles
//! - [`catalog`] - Read-only product lookup
//! - [`view`] - Cart lines joined with product details
//! - [`routes`] - Axum handlers and the application router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
pub mod view;

pub use routes::app;
