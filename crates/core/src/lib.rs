//! Echo & Ember Core - Shared types library.
//!
//! This crate provides common types used across all Echo & Ember components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain rules - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, order status machine, categories,
//!   product options, and money arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
