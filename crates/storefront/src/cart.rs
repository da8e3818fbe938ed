//! Cart persistence: the storage adapter and the read-modify-write mutators.
//!
//! The cart is never cached. Every operation starts with [`CartStore::read`],
//! so a change made by another tab between two operations is always picked up.
//! There is no locking; two tabs racing on the same key resolve as
//! last-writer-wins.

use banda_core::{Cart, CartItem, Quantity, Sku};
use tracing::instrument;

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Reads and writes the cart record under one fixed key.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store for the record at `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The underlying key-value store.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Key of the cart record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the cart.
    ///
    /// A missing record, an unreadable store and a malformed record all read
    /// as an empty cart. The latter two are logged.
    #[must_use]
    pub fn read(&self) -> Cart {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Cart storage unreadable, using empty cart"
                );
                return Cart::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "Discarding malformed cart record");
            Cart::new()
        })
    }

    /// Persist the cart, replacing the stored record.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store rejects the write (for
    /// example when its quota is exhausted). The previous record is kept.
    pub fn write(&self, cart: &Cart) -> Result<()> {
        let raw = serde_json::to_string(cart)?;
        self.storage.set_item(&self.key, &raw)?;
        tracing::debug!(key = %self.key, lines = cart.len(), "Cart saved");
        Ok(())
    }

    /// Add a line, summing quantities if the SKU is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self, item), fields(sku = %item.sku, qty = %item.qty))]
    pub fn add_item(&self, item: CartItem) -> Result<Cart> {
        let mut cart = self.read();
        cart.add(item);
        self.write(&cart)?;
        Ok(cart)
    }

    /// Drop the line for `sku`. The record is rewritten even if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self), fields(sku = %sku))]
    pub fn remove_item(&self, sku: &Sku) -> Result<Cart> {
        let mut cart = self.read();
        cart.remove(sku);
        self.write(&cart)?;
        Ok(cart)
    }

    /// Step a line's quantity by `delta`, clamped to at least one.
    ///
    /// Returns `Ok(None)` without writing if `sku` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self), fields(sku = %sku))]
    pub fn set_quantity(&self, sku: &Sku, delta: i64) -> Result<Option<Cart>> {
        let mut cart = self.read();
        if !cart.adjust_quantity(sku, delta) {
            return Ok(None);
        }
        self.write(&cart)?;
        Ok(Some(cart))
    }

    /// Replace a line's quantity outright (direct entry in the drawer).
    ///
    /// Returns `Ok(None)` without writing if `sku` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self), fields(sku = %sku, qty = %qty))]
    pub fn replace_quantity(&self, sku: &Sku, qty: Quantity) -> Result<Option<Cart>> {
        let mut cart = self.read();
        if !cart.set_quantity(sku, qty) {
            return Ok(None);
        }
        self.write(&cart)?;
        Ok(Some(cart))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear(&self) -> Result<Cart> {
        let cart = Cart::new();
        self.write(&cart)?;
        Ok(cart)
    }
}
