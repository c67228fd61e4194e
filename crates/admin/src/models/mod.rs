//! Domain models for the admin service.

pub mod order;
pub mod product;
pub mod session;

pub use order::{AdminOrder, AdminOrderItem, AdminOrderSummary};
pub use product::Product;
pub use session::{CurrentAdmin, keys as session_keys};
