//! Core types for Lojinha.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use address::ShippingAddress;
pub use email::{Email, EmailError};
pub use id::*;
pub use role::Role;
pub use status::{OrderStatus, OrderStatusError, PaymentMethod, PaymentMethodError};
