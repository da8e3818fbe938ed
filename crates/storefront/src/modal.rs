//! Product detail modal state machine.
//!
//! ```text
//!            open(card)
//!   Closed ─────────────▶ Open { product, qty }
//!     ▲                      │  +/−/entry change qty (≥ 1)
//!     └──────────────────────┘  confirm → cart line snapshot
//!        close / Escape
//! ```

use banda_core::{CartItem, Quantity};

use crate::catalog::ProductCard;
use crate::views::ModalView;

/// Modal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(OpenModal),
}

/// Data held while the modal is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenModal {
    pub product: ProductCard,
    pub description: String,
    pub qty: Quantity,
}

/// The product modal.
#[derive(Debug, Clone, Default)]
pub struct ProductModal {
    state: ModalState,
}

impl ProductModal {
    /// Create a closed modal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ModalState {
        &self.state
    }

    /// Whether the modal is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    /// Open for a product, resetting the quantity to one.
    ///
    /// Opening while already open replaces the product.
    pub fn open(&mut self, product: ProductCard, description: &str) {
        self.state = ModalState::Open(OpenModal {
            product,
            description: description.to_string(),
            qty: Quantity::ONE,
        });
    }

    /// Close. Returns `true` if the modal was open.
    pub fn close(&mut self) -> bool {
        matches!(std::mem::take(&mut self.state), ModalState::Open(_))
    }

    /// Step the chosen quantity. Returns the new quantity, or `None` if closed.
    pub fn step(&mut self, delta: i64) -> Option<Quantity> {
        self.open_mut().map(|open| {
            open.qty = open.qty.offset(delta);
            open.qty
        })
    }

    /// Set the chosen quantity from the quantity field.
    ///
    /// Returns the new quantity, or `None` if closed.
    pub fn enter_quantity(&mut self, raw: &str) -> Option<Quantity> {
        self.open_mut().map(|open| {
            open.qty = Quantity::parse_lenient(raw);
            open.qty
        })
    }

    /// Snapshot the product and chosen quantity as a cart line.
    ///
    /// The modal stays open after confirming.
    #[must_use]
    pub fn confirm(&self) -> Option<CartItem> {
        match &self.state {
            ModalState::Open(open) => Some(open.product.to_item(open.qty)),
            ModalState::Closed => None,
        }
    }

    /// View model for the modal body, if open.
    #[must_use]
    pub fn view(&self) -> Option<ModalView> {
        match &self.state {
            ModalState::Open(open) => Some(ModalView::new(
                &open.product,
                &open.description,
                open.qty.get(),
            )),
            ModalState::Closed => None,
        }
    }

    fn open_mut(&mut self) -> Option<&mut OpenModal> {
        match &mut self.state {
            ModalState::Open(open) => Some(open),
            ModalState::Closed => None,
        }
    }
}
