//! Echo & Ember Admin library.
//!
//! Back-office service: dashboard aggregates, product management with media
//! uploads, order status transitions and site settings.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
