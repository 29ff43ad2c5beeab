//! Core types for the Candy Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod price;

pub use email::{Email, EmailError};
pub use id::OrderId;
pub use phone::{Phone, PhoneError};
pub use price::Price;
