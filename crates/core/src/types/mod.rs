//! Core types for Echo & Ember.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod money;
pub mod options;
pub mod settings;
pub mod status;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{line_total, order_total, shipping_for_subtotal};
pub use options::{OptionGroup, SelectedOptions, parse_option_groups, parse_selected_options};
pub use settings::SiteSettings;
pub use status::{OrderStatus, Role, StatusError, TIMELINE};
