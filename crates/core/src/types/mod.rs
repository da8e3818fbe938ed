//! Core types for the Banda4erep cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod cart;
pub mod price;
pub mod quantity;
pub mod sku;

pub use cart::{Cart, CartItem};
pub use price::{Price, PriceError};
pub use quantity::Quantity;
pub use sku::{Sku, SkuError};
