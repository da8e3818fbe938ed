//! Banda shopping-cart widget.
//!
//! The cart lives in a key-value store as one JSON record. Every interaction
//! reads that record, changes it, writes it back, and re-renders the badge,
//! the mini-cart and the drawer from what was written. Other tabs sharing the
//! store pick the change up through their storage events.
//!
//! # Modules
//!
//! - [`storage`] - Key-value store port and its memory/file backends
//! - [`cart`] - Read-modify-write operations on the stored cart record
//! - [`views`] / [`templates`] - View models and HTML fragments
//! - [`page`] - The page regions the widget draws on
//! - [`dispatch`] - Role-based click/input/key routing
//! - [`widget`] - Everything wired together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod modal;
pub mod page;
pub mod storage;
pub mod templates;
pub mod views;
pub mod widget;

pub use cart::CartStore;
pub use config::{ConfigError, WidgetConfig};
pub use dispatch::{Action, ActionId, Element, Key, PageEvent};
pub use error::{CartError, Result};
pub use events::{CART_UPDATED, CartEvent, UpdateSource};
pub use page::{HeadlessPage, PageSurface, Region};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageChange, StorageError};
pub use widget::{ButtonFeedback, CartWidget, DispatchOutcome};
