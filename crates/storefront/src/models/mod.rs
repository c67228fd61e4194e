//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database
//! row types.

pub mod order;
pub mod product;
pub mod review;
pub mod session;
pub mod user;

pub use order::{NewOrderLine, Order, OrderItem, ShippingDetails, TimelineStep, timeline_for};
pub use product::Product;
pub use review::{NewReview, Review};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
