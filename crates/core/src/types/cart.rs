//! The cart and its line items.
//!
//! All operations here are pure list manipulation on an owned [`Cart`]; the
//! storefront crate wraps them in read-modify-write cycles against storage.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Price, Quantity, Sku};

/// One product line in the cart.
///
/// `title`, `price` and `image` are a snapshot taken from the catalog when the
/// line was first added and are never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: Sku,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    pub price: Price,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    pub qty: Quantity,
}

/// Pages without `data-title` or `data-image` store `null` for them.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CartItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }
}

/// The persisted cart: an ordered list of line items with unique SKUs.
///
/// Deserializing merges duplicate SKUs into the first occurrence, so a
/// hand-edited or foreign record still upholds the uniqueness invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Deserialize)]
struct RawCart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCart::deserialize(deserializer)?;
        Ok(raw.items.into_iter().collect())
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        let mut cart = Self::new();
        for item in iter {
            cart.add(item);
        }
        cart
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a SKU.
    #[must_use]
    pub fn find(&self, sku: &Sku) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.sku == sku)
    }

    /// Add a line, merging into an existing line with the same SKU.
    ///
    /// On merge only the quantity changes; the existing snapshot of title,
    /// price and image is kept.
    pub fn add(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|existing| existing.sku == item.sku) {
            Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
            None => self.items.push(item),
        }
    }

    /// Remove the line for a SKU. Returns `true` if a line was removed.
    pub fn remove(&mut self, sku: &Sku) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.sku != sku);
        self.items.len() != before
    }

    /// Step a line's quantity by `delta`, never below one.
    ///
    /// Returns `false` (and changes nothing) if the SKU is not in the cart.
    pub fn adjust_quantity(&mut self, sku: &Sku, delta: i64) -> bool {
        self.line_mut(sku).is_some_and(|item| {
            item.qty = item.qty.offset(delta);
            true
        })
    }

    /// Replace a line's quantity. Returns `false` if the SKU is not in the cart.
    pub fn set_quantity(&mut self, sku: &Sku, qty: Quantity) -> bool {
        self.line_mut(sku).is_some_and(|item| {
            item.qty = qty;
            true
        })
    }

    /// Sum of quantities across all lines (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty.get())).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn line_mut(&mut self, sku: &Sku) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.sku == sku)
    }
}
