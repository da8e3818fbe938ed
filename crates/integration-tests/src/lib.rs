//! Integration tests for the Banda cart widget.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p banda-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `click_flows` - Shopper journeys driven through page events
//! - `cross_tab` - Several tabs sharing one store
//!
//! This crate holds the shared harness: a [`Browser`] owning one in-memory
//! store, and [`Tab`]s opened onto it, each with its own page and widget.

#![cfg_attr(not(test), forbid(unsafe_code))]

use banda_core::{CartItem, Price, Quantity, Sku};
use banda_storefront::dispatch::Element;
use banda_storefront::storage::StorageEvents;
use banda_storefront::{
    CartError, CartEvent, CartStore, CartWidget, DispatchOutcome, HeadlessPage, MemoryStorage,
    PageEvent, Region,
};
use tokio::sync::broadcast;

/// Cart key used by every tab in the harness.
pub const TEST_CART_KEY: &str = "banda4erep_cart_v1";

/// One shared store, like the local storage of a browser profile.
#[derive(Debug, Clone, Default)]
pub struct Browser {
    storage: MemoryStorage,
}

impl Browser {
    /// A browser with unlimited storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A browser whose storage rejects writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            storage: MemoryStorage::with_quota(Some(quota)),
        }
    }

    /// Open a tab showing every cart region.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial render fails.
    pub fn open_tab(&self) -> Result<Tab, CartError> {
        self.open_tab_with(HeadlessPage::full())
    }

    /// Open a tab on a specific page.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial render fails.
    pub fn open_tab_with(&self, page: HeadlessPage) -> Result<Tab, CartError> {
        let storage = self.storage.open_tab();
        let storage_events = storage.subscribe();
        let mut widget = CartWidget::new(CartStore::new(storage, TEST_CART_KEY), page);
        let cart_events = widget.subscribe();
        widget.mount()?;
        Ok(Tab {
            widget,
            storage_events,
            cart_events,
        })
    }

    /// The raw stored record.
    #[must_use]
    pub fn stored_record(&self) -> Option<String> {
        use banda_storefront::KeyValueStore;
        self.storage.get_item(TEST_CART_KEY).ok().flatten()
    }
}

/// One open tab: its widget plus the events it has received.
pub struct Tab {
    pub widget: CartWidget<MemoryStorage, HeadlessPage>,
    storage_events: StorageEvents,
    cart_events: broadcast::Receiver<CartEvent>,
}

impl Tab {
    /// Deliver a page event.
    ///
    /// # Errors
    ///
    /// Returns whatever the widget returns.
    pub fn dispatch(&mut self, event: &PageEvent) -> Result<DispatchOutcome, CartError> {
        self.widget.handle(event)
    }

    /// Click the innermost element of `path` (listed target first).
    ///
    /// # Errors
    ///
    /// Returns whatever the widget returns.
    pub fn click(&mut self, path: Vec<Element>) -> Result<DispatchOutcome, CartError> {
        self.dispatch(&PageEvent::click(path))
    }

    /// Deliver every storage event other tabs have produced so far.
    ///
    /// Returns how many were delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if a re-render fails.
    pub fn sync(&mut self) -> Result<usize, CartError> {
        let mut delivered = 0;
        while let Some(change) = self.storage_events.try_next() {
            self.widget.handle(&PageEvent::StorageChanged(change))?;
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Drain the `cart:updated` notifications received so far.
    pub fn notifications(&mut self) -> Vec<CartEvent> {
        std::iter::from_fn(|| self.cart_events.try_recv().ok()).collect()
    }

    /// Badge text, or `None` if the badge is hidden.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        let page = self.widget.page();
        if page.is_hidden(Region::Badge) {
            None
        } else {
            page.text(Region::Badge)
        }
    }

    /// Text of a region.
    #[must_use]
    pub fn text(&self, region: Region) -> &str {
        self.widget.page().text(region).unwrap_or_default()
    }

    /// Inner HTML of a region.
    #[must_use]
    pub fn html(&self, region: Region) -> &str {
        self.widget.page().html(region).unwrap_or_default()
    }
}

/// A catalog card as the storefront markup declares it.
#[must_use]
pub fn product_card(sku: &str, title: &str, price: &str) -> Element {
    Element::new()
        .with_class("card js-product")
        .with_attr("data-sku", sku)
        .with_attr("data-title", title)
        .with_attr("data-price", price)
        .with_attr("data-image", &format!("img/{sku}.jpg"))
}

/// Path for a click on a card's buy button.
#[must_use]
pub fn buy_button_path(card: Element) -> Vec<Element> {
    vec![Element::new().with_class("btn js-add-to-cart"), card]
}

/// A control carrying `data-sku`, such as a drawer stepper.
#[must_use]
pub fn sku_control(class: &str, sku: &str) -> Element {
    Element::new().with_class(class).with_attr("data-sku", sku)
}

/// A cart line built directly.
///
/// # Panics
///
/// Panics if `sku` is blank.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn line(sku: &str, price: u64, qty: u32) -> CartItem {
    CartItem {
        sku: Sku::parse(sku).unwrap(),
        title: sku.to_string(),
        price: Price::from_rubles(price),
        image: format!("img/{sku}.jpg"),
        qty: Quantity::new(qty),
    }
}
