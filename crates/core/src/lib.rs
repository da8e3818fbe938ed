//! Banda4erep Core - Cart domain types.
//!
//! This crate provides the types shared by the storefront widget and the CLI:
//! - `storefront` - Cart widget library (storage, rendering, event dispatch)
//! - `cli` - Command-line host for the widget over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types and pure list operations - no I/O, no
//! storage access, no rendering. Every mutation here works on an owned [`Cart`]
//! value; persisting it is the storefront's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for SKUs, prices and quantities, plus the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
