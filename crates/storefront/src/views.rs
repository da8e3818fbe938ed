//! Render-ready view models.
//!
//! These carry already-formatted strings so templates (or any other renderer)
//! never touch prices or quantities directly. Both the mini-cart and the
//! drawer are built from the same [`CartView`], so their totals always agree.

use banda_core::{Cart, CartItem, Price};

use crate::catalog::ProductCard;

/// Header badge showing the number of units in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeView {
    pub count: u64,
}

impl BadgeView {
    /// The badge is hidden while the cart is empty.
    #[must_use]
    pub const fn hidden(&self) -> bool {
        self.count == 0
    }

    /// Badge text.
    #[must_use]
    pub fn text(&self) -> String {
        self.count.to_string()
    }
}

impl From<&Cart> for BadgeView {
    fn from(cart: &Cart) -> Self {
        Self {
            count: cart.item_count(),
        }
    }
}

/// One cart line, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    pub sku: String,
    pub title: String,
    pub image: String,
    pub qty: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartItem> for CartRowView {
    fn from(item: &CartItem) -> Self {
        Self {
            sku: item.sku.to_string(),
            title: item.title.clone(),
            image: item.image.clone(),
            qty: item.qty.get(),
            unit_price: item.price.format_rub(),
            line_total: item.line_total().format_rub(),
        }
    }
}

/// Cart display data shared by the mini-cart and the drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub rows: Vec<CartRowView>,
    pub total: String,
    pub total_amount: Price,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let total_amount = cart.total();
        Self {
            rows: cart.items().iter().map(CartRowView::from).collect(),
            total: total_amount.format_rub(),
            total_amount,
            item_count: cart.item_count(),
        }
    }
}

/// Product modal contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub sku: String,
    pub title: String,
    pub image: String,
    pub description: String,
    pub price: String,
    pub qty: u32,
}

impl ModalView {
    pub(crate) fn new(card: &ProductCard, description: &str, qty: u32) -> Self {
        Self {
            sku: card.sku.to_string(),
            title: card.title.clone(),
            image: card.image.clone(),
            description: description.to_string(),
            price: card.price.format_rub(),
            qty,
        }
    }
}
