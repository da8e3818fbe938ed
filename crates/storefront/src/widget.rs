//! The cart widget: storage, rendering and event handling wired together.
//!
//! Control flow for every interaction is the same: resolve the event to an
//! [`Action`], run the mutator (a full read-modify-write against storage),
//! re-render every region from the freshly written cart, then emit
//! `cart:updated`. A failed write leaves storage and the page untouched apart
//! from a notice.

use std::time::Duration;

use askama::Template;
use banda_core::{Cart, CartItem, Quantity, Sku};
use tokio::sync::broadcast;
use tracing::instrument;

use crate::cart::CartStore;
use crate::catalog::{Catalog, ProductCard};
use crate::dispatch::{self, Action, ActionId, PageEvent};
use crate::error::{self, Result};
use crate::events::{CartEvent, CartNotifier, UpdateSource};
use crate::modal::ProductModal;
use crate::page::{PageSurface, Region};
use crate::storage::{KeyValueStore, StorageChange};
use crate::templates::{DrawerItemsTemplate, MiniCartItemsTemplate, ProductModalTemplate};
use crate::views::{BadgeView, CartView};

/// Buy-button label right after a catalog add.
pub const ADDED_LABEL: &str = "В корзине";

/// Buy-button label at rest.
pub const BUY_LABEL: &str = "Купить";

/// How long the buy button shows [`ADDED_LABEL`].
pub const ADDED_FEEDBACK: Duration = Duration::from_millis(1200);

const MINI_CART_REGIONS: [Region; 3] = [
    Region::MiniCart,
    Region::MiniCartList,
    Region::MiniCartTotal,
];
const DRAWER_REGIONS: [Region; 3] = [Region::Drawer, Region::DrawerList, Region::DrawerTotal];

/// Temporary relabel of the button that added an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonFeedback {
    pub label: &'static str,
    pub restore_label: &'static str,
    pub duration: Duration,
}

impl ButtonFeedback {
    const ADDED: Self = Self {
        label: ADDED_LABEL,
        restore_label: BUY_LABEL,
        duration: ADDED_FEEDBACK,
    };
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing on the page wanted the event, or the target region is absent.
    Ignored,
    /// The action ran.
    Handled(ActionId),
    /// An item was added to the cart.
    Added {
        sku: Sku,
        feedback: Option<ButtonFeedback>,
    },
}

/// The cart widget for one page.
pub struct CartWidget<S, P> {
    store: CartStore<S>,
    page: P,
    catalog: Catalog,
    modal: ProductModal,
    notifier: CartNotifier,
}

impl<S: KeyValueStore, P: PageSurface> CartWidget<S, P> {
    /// Create a widget over a store and a page.
    pub fn new(store: CartStore<S>, page: P) -> Self {
        Self {
            store,
            page,
            catalog: Catalog::default(),
            modal: ProductModal::new(),
            notifier: CartNotifier::new(),
        }
    }

    /// Replace the product description table.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// The cart store.
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// The page.
    pub const fn page(&self) -> &P {
        &self.page
    }

    /// The page, mutably (for host-driven changes such as closing a region).
    pub const fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// The product modal.
    pub const fn modal(&self) -> &ProductModal {
        &self.modal
    }

    /// Listen for `cart:updated`.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.notifier.subscribe()
    }

    /// Initial render on page load.
    ///
    /// # Errors
    ///
    /// Returns an error if a fragment fails to render.
    pub fn mount(&mut self) -> Result<()> {
        let cart = self.store.read();
        self.render_all(&cart)
    }

    // =========================================================================
    // Public cart API
    // =========================================================================

    /// Current cart, freshly read from storage.
    pub fn read(&self) -> Cart {
        self.store.read()
    }

    /// Replace the stored cart, re-render and notify.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (the page gets a notice) or a
    /// fragment fails to render.
    pub fn write(&mut self, cart: &Cart) -> Result<()> {
        let result = self.store.write(cart);
        self.saved(result)?;
        self.after_write(cart, UpdateSource::Local)
    }

    /// Add an item, merging by SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or a fragment fails to render.
    pub fn add(&mut self, item: CartItem) -> Result<()> {
        let result = self.store.add_item(item);
        let cart = self.saved(result)?;
        self.after_write(&cart, UpdateSource::Local)
    }

    /// Remove the line for `sku`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or a fragment fails to render.
    pub fn remove(&mut self, sku: &Sku) -> Result<()> {
        let result = self.store.remove_item(sku);
        let cart = self.saved(result)?;
        self.after_write(&cart, UpdateSource::Local)
    }

    /// Step a line's quantity. Returns `false` if the SKU is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or a fragment fails to render.
    pub fn set_quantity(&mut self, sku: &Sku, delta: i64) -> Result<bool> {
        let result = self.store.set_quantity(sku, delta);
        match self.saved(result)? {
            Some(cart) => self.after_write(&cart, UpdateSource::Local).map(|()| true),
            None => Ok(false),
        }
    }

    /// Set a line's quantity outright. Returns `false` if the SKU is not in
    /// the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or a fragment fails to render.
    pub fn set_line_quantity(&mut self, sku: &Sku, qty: Quantity) -> Result<bool> {
        let result = self.store.replace_quantity(sku, qty);
        match self.saved(result)? {
            Some(cart) => self.after_write(&cart, UpdateSource::Local).map(|()| true),
            None => Ok(false),
        }
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or a fragment fails to render.
    pub fn clear(&mut self) -> Result<()> {
        let result = self.store.clear();
        let cart = self.saved(result)?;
        self.after_write(&cart, UpdateSource::Local)
    }

    /// Re-render the badge from storage.
    pub fn update_badge(&mut self) {
        let cart = self.store.read();
        self.render_badge(&cart);
    }

    /// Re-render the mini-cart from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment fails to render.
    pub fn render_mini_cart(&mut self) -> Result<()> {
        let view = CartView::from(&self.store.read());
        self.render_mini_cart_view(&view)
    }

    /// Re-render the drawer from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment fails to render.
    pub fn render_drawer(&mut self) -> Result<()> {
        let view = CartView::from(&self.store.read());
        self.render_drawer_view(&view)
    }

    /// Re-render every region from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a fragment fails to render.
    pub fn refresh(&mut self) -> Result<()> {
        let cart = self.store.read();
        self.render_all(&cart)
    }

    // =========================================================================
    // Event handling
    // =========================================================================

    /// Resolve and perform a page event.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting action fails.
    pub fn handle(&mut self, event: &PageEvent) -> Result<DispatchOutcome> {
        match dispatch::resolve(event) {
            Some(action) => self.perform(action),
            None => Ok(DispatchOutcome::Ignored),
        }
    }

    /// Perform a resolved action.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage write or a render fails.
    #[instrument(skip(self, action), fields(action = ?action.id()))]
    pub fn perform(&mut self, action: Action) -> Result<DispatchOutcome> {
        let id = action.id();
        let handled = DispatchOutcome::Handled(id);
        match action {
            Action::AddToCart(product) => {
                error::add_breadcrumb("Added to cart", Some(&[("sku", product.sku.as_str())]));
                let sku = product.sku.clone();
                self.add(product.to_item(Quantity::ONE))?;
                Ok(DispatchOutcome::Added {
                    sku,
                    feedback: Some(ButtonFeedback::ADDED),
                })
            }
            Action::OpenProduct(product) => self.open_modal(product, handled),
            Action::CloseMiniCart => {
                self.page.set_open(Region::MiniCart, false);
                Ok(handled)
            }
            Action::RemoveFromMiniCart(sku) | Action::RemoveFromDrawer(sku) => {
                error::add_breadcrumb("Removed from cart", Some(&[("sku", sku.as_str())]));
                self.remove(&sku)?;
                Ok(handled)
            }
            Action::OpenDrawer => {
                self.page.set_open(Region::Drawer, true);
                self.page.set_open(Region::MiniCart, false);
                self.render_drawer()?;
                Ok(handled)
            }
            Action::CloseDrawer => {
                self.page.set_open(Region::Drawer, false);
                self.render_mini_cart()?;
                Ok(handled)
            }
            Action::IncrementLine(sku) => self.step_line(&sku, 1, handled),
            Action::DecrementLine(sku) => self.step_line(&sku, -1, handled),
            Action::SetLineQuantity { sku, qty } => {
                if self.set_line_quantity(&sku, qty)? {
                    Ok(handled)
                } else {
                    Ok(DispatchOutcome::Ignored)
                }
            }
            Action::CloseModal => Ok(self.close_modal(handled)),
            Action::ModalIncrement => {
                let qty = self.modal.step(1);
                Ok(self.show_modal_quantity(qty, handled))
            }
            Action::ModalDecrement => {
                let qty = self.modal.step(-1);
                Ok(self.show_modal_quantity(qty, handled))
            }
            Action::ModalSetQuantity(raw) => {
                let qty = self.modal.enter_quantity(&raw);
                Ok(self.show_modal_quantity(qty, handled))
            }
            Action::ModalBuy => {
                let Some(item) = self.modal.confirm() else {
                    return Ok(DispatchOutcome::Ignored);
                };
                error::add_breadcrumb(
                    "Added to cart from product modal",
                    Some(&[("sku", item.sku.as_str())]),
                );
                let sku = item.sku.clone();
                self.add(item)?;
                Ok(DispatchOutcome::Added {
                    sku,
                    feedback: None,
                })
            }
            Action::SyncFromStorage(change) => {
                if self.handle_storage_change(&change)? {
                    Ok(handled)
                } else {
                    Ok(DispatchOutcome::Ignored)
                }
            }
        }
    }

    /// Re-sync after another tab changed the store.
    ///
    /// Changes to other keys are ignored. Returns `true` if the views were
    /// re-rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if a fragment fails to render.
    pub fn handle_storage_change(&mut self, change: &StorageChange) -> Result<bool> {
        if change.key != self.store.key() {
            tracing::trace!(key = %change.key, "Ignoring change to unrelated storage key");
            return Ok(false);
        }
        tracing::debug!(origin = %change.origin, "Cart changed in another tab");
        let cart = self.store.read();
        self.after_write(&cart, UpdateSource::OtherTab)?;
        Ok(true)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Report a failed save to logs, Sentry and the shopper.
    fn saved<T>(&mut self, result: Result<T>) -> Result<T> {
        result.inspect_err(|e| {
            e.report();
            self.page.show_notice(e.user_message());
        })
    }

    fn after_write(&mut self, cart: &Cart, source: UpdateSource) -> Result<()> {
        if source == UpdateSource::Local {
            self.page.set_hidden(Region::Notice, true);
        }
        let rendered = self.render_all(cart);
        self.notifier.emit(CartEvent::Updated {
            item_count: cart.item_count(),
            source,
        });
        rendered
    }

    fn render_all(&mut self, cart: &Cart) -> Result<()> {
        self.render_badge(cart);
        let view = CartView::from(cart);
        self.render_mini_cart_view(&view)?;
        self.render_drawer_view(&view)
    }

    fn render_badge(&mut self, cart: &Cart) {
        if !self.page.has(Region::Badge) {
            return;
        }
        let badge = BadgeView::from(cart);
        self.page.set_text(Region::Badge, &badge.text());
        self.page.set_hidden(Region::Badge, badge.hidden());
    }

    fn render_mini_cart_view(&mut self, view: &CartView) -> Result<()> {
        if !MINI_CART_REGIONS.iter().all(|region| self.page.has(*region)) {
            return Ok(());
        }
        let html = MiniCartItemsTemplate { cart: view }.render()?;
        self.page.set_html(Region::MiniCartList, &html);
        self.page.set_text(Region::MiniCartTotal, &view.total);
        let drawer_open = self.page.is_open(Region::Drawer);
        self.page.set_open(Region::MiniCart, !view.is_empty() && !drawer_open);
        tracing::debug!(rows = view.rows.len(), "Mini-cart rendered");
        Ok(())
    }

    fn render_drawer_view(&mut self, view: &CartView) -> Result<()> {
        if !DRAWER_REGIONS.iter().all(|region| self.page.has(*region)) {
            return Ok(());
        }
        let html = DrawerItemsTemplate { cart: view }.render()?;
        self.page.set_html(Region::DrawerList, &html);
        self.page.set_text(Region::DrawerTotal, &view.total);
        tracing::debug!(rows = view.rows.len(), "Drawer rendered");
        Ok(())
    }

    fn step_line(
        &mut self,
        sku: &Sku,
        delta: i64,
        handled: DispatchOutcome,
    ) -> Result<DispatchOutcome> {
        if self.set_quantity(sku, delta)? {
            Ok(handled)
        } else {
            Ok(DispatchOutcome::Ignored)
        }
    }

    fn open_modal(
        &mut self,
        product: ProductCard,
        handled: DispatchOutcome,
    ) -> Result<DispatchOutcome> {
        if !self.page.has(Region::Modal) {
            return Ok(DispatchOutcome::Ignored);
        }
        let description = self.catalog.description(&product.sku).to_string();
        self.modal.open(product, &description);
        if let Some(view) = self.modal.view() {
            let html = ProductModalTemplate { modal: &view }.render()?;
            self.page.set_html(Region::ModalContent, &html);
            self.page.set_text(Region::ModalQuantity, &view.qty.to_string());
        }
        self.page.set_open(Region::Modal, true);
        self.page.set_scroll_locked(true);
        Ok(handled)
    }

    fn close_modal(&mut self, handled: DispatchOutcome) -> DispatchOutcome {
        if !self.page.has(Region::Modal) {
            return DispatchOutcome::Ignored;
        }
        self.modal.close();
        self.page.set_open(Region::Modal, false);
        self.page.set_scroll_locked(false);
        handled
    }

    fn show_modal_quantity(
        &mut self,
        qty: Option<Quantity>,
        handled: DispatchOutcome,
    ) -> DispatchOutcome {
        match qty {
            Some(qty) => {
                self.page.set_text(Region::ModalQuantity, &qty.to_string());
                handled
            }
            None => DispatchOutcome::Ignored,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use banda_core::Price;

    use super::*;
    use crate::dispatch::Element;
    use crate::error::CartError;
    use crate::page::HeadlessPage;
    use crate::storage::MemoryStorage;

    const KEY: &str = "test_cart";

    type TestWidget = CartWidget<MemoryStorage, HeadlessPage>;

    fn widget_on(page: HeadlessPage) -> TestWidget {
        let mut widget = CartWidget::new(CartStore::new(MemoryStorage::new(), KEY), page);
        widget.mount().unwrap();
        widget
    }

    fn widget() -> TestWidget {
        widget_on(HeadlessPage::full())
    }

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn item(s: &str, price: u64, qty: u32) -> CartItem {
        CartItem {
            sku: sku(s),
            title: s.to_string(),
            price: Price::from_rubles(price),
            image: format!("img/{s}.jpg"),
            qty: Quantity::new(qty),
        }
    }

    fn card(s: &str, price: &str) -> Element {
        Element::new()
            .with_class("card js-product")
            .with_attr("data-sku", s)
            .with_attr("data-title", s)
            .with_attr("data-price", price)
            .with_attr("data-image", "img.jpg")
    }

    fn buy_click(s: &str, price: &str) -> PageEvent {
        PageEvent::click(vec![Element::new().with_class("js-add-to-cart"), card(s, price)])
    }

    #[test]
    fn test_mount_renders_empty_state() {
        let widget = widget();
        let page = widget.page();
        assert_eq!(page.text(Region::Badge), Some("0"));
        assert!(page.is_hidden(Region::Badge));
        assert!(!page.is_open(Region::MiniCart));
        assert_eq!(page.text(Region::DrawerTotal), Some("0\u{a0}₽"));
    }

    #[test]
    fn test_catalog_buy_updates_every_view_and_notifies() {
        let mut widget = widget();
        let mut events = widget.subscribe();

        let outcome = widget.handle(&buy_click("tshirt", "2000")).unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Added {
                sku: sku("tshirt"),
                feedback: Some(ButtonFeedback::ADDED)
            }
        );

        let page = widget.page();
        assert_eq!(page.text(Region::Badge), Some("1"));
        assert!(!page.is_hidden(Region::Badge));
        assert!(page.is_open(Region::MiniCart));
        assert_eq!(page.text(Region::MiniCartTotal), Some("2\u{a0}000\u{a0}₽"));
        assert!(page.html(Region::DrawerList).unwrap().contains("data-sku=\"tshirt\""));
        assert_eq!(
            events.try_recv().unwrap(),
            CartEvent::Updated {
                item_count: 1,
                source: UpdateSource::Local
            }
        );
    }

    #[test]
    fn test_mini_cart_and_drawer_totals_agree() {
        let mut widget = widget();
        widget.add(item("a", 1000, 2)).unwrap();
        widget.add(item("b", 1500, 1)).unwrap();
        let page = widget.page();
        assert_eq!(page.text(Region::MiniCartTotal), Some("3\u{a0}500\u{a0}₽"));
        assert_eq!(
            page.text(Region::MiniCartTotal),
            page.text(Region::DrawerTotal)
        );
    }

    #[test]
    fn test_drawer_hides_mini_cart_until_closed() {
        let mut widget = widget();
        widget.add(item("a", 100, 1)).unwrap();

        let open = PageEvent::click(vec![Element::new().with_class("js-open-cart")]);
        widget.handle(&open).unwrap();
        assert!(widget.page().is_open(Region::Drawer));
        assert!(!widget.page().is_open(Region::MiniCart));

        // Writes while the drawer is open keep the mini-cart hidden.
        widget.add(item("b", 100, 1)).unwrap();
        assert!(!widget.page().is_open(Region::MiniCart));

        let close = PageEvent::click(vec![Element::new().with_attr("data-cart-close", "")]);
        widget.handle(&close).unwrap();
        assert!(!widget.page().is_open(Region::Drawer));
        assert!(widget.page().is_open(Region::MiniCart));
    }

    #[test]
    fn test_mini_cart_close_and_remove() {
        let mut widget = widget();
        widget.add(item("a", 100, 1)).unwrap();
        widget.add(item("b", 100, 1)).unwrap();

        let close = PageEvent::click(vec![Element::new().with_class("mini-cart__close")]);
        widget.handle(&close).unwrap();
        assert!(!widget.page().is_open(Region::MiniCart));

        let remove = PageEvent::click(vec![Element::new()
            .with_class("js-mini-remove")
            .with_attr("data-sku", "a")]);
        widget.handle(&remove).unwrap();
        assert!(widget.read().find(&sku("a")).is_none());
        assert!(widget.page().is_open(Region::MiniCart));

        widget.remove(&sku("b")).unwrap();
        assert!(!widget.page().is_open(Region::MiniCart));
        assert!(widget.page().is_hidden(Region::Badge));
    }

    #[test]
    fn test_drawer_steppers_clamp() {
        let mut widget = widget();
        widget.add(item("a", 100, 1)).unwrap();
        let stepper = |class: &str| {
            PageEvent::click(vec![Element::new().with_class(class).with_attr("data-sku", "a")])
        };

        widget.handle(&stepper("js-inc")).unwrap();
        widget.handle(&stepper("js-inc")).unwrap();
        assert_eq!(widget.read().item_count(), 3);
        for _ in 0..5 {
            widget.handle(&stepper("js-dec")).unwrap();
        }
        assert_eq!(widget.read().item_count(), 1);
        assert_eq!(widget.page().text(Region::Badge), Some("1"));
    }

    #[test]
    fn test_stepper_for_missing_sku_is_ignored() {
        let mut widget = widget();
        let mut events = widget.subscribe();
        let outcome = widget
            .handle(&PageEvent::click(vec![Element::new()
                .with_class("js-inc")
                .with_attr("data-sku", "ghost")]))
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_quantity_field_entry() {
        let mut widget = widget();
        widget.add(item("a", 100, 1)).unwrap();
        let field = Element::new().with_class("js-qty").with_attr("data-sku", "a");
        widget
            .handle(&PageEvent::Input {
                path: vec![field],
                value: "7".to_string(),
            })
            .unwrap();
        assert_eq!(widget.read().item_count(), 7);
    }

    #[test]
    fn test_product_modal_flow() {
        let mut widget = widget();
        let open = PageEvent::click(vec![Element::new(), card("hoodie", "4500")]);
        assert_eq!(
            widget.handle(&open).unwrap(),
            DispatchOutcome::Handled(ActionId::OpenProduct)
        );
        assert!(widget.page().is_open(Region::Modal));
        assert!(widget.page().scroll_locked());
        let body = widget.page().html(Region::ModalContent).unwrap();
        assert!(body.contains("Мягкий флис внутри."));
        assert!(body.contains("4\u{a0}500\u{a0}₽"));

        let plus = PageEvent::click(vec![Element::new().with_id("pm-inc")]);
        widget.handle(&plus).unwrap();
        widget.handle(&plus).unwrap();
        assert_eq!(widget.page().text(Region::ModalQuantity), Some("3"));

        let buy = PageEvent::click(vec![Element::new().with_id("pm-buy")]);
        let outcome = widget.handle(&buy).unwrap();
        assert!(matches!(outcome, DispatchOutcome::Added { feedback: None, .. }));
        assert_eq!(widget.read().item_count(), 3);
        assert!(widget.modal().is_open());

        widget.handle(&PageEvent::KeyDown(dispatch::Key::Escape)).unwrap();
        assert!(!widget.page().is_open(Region::Modal));
        assert!(!widget.page().scroll_locked());
        assert!(!widget.modal().is_open());
    }

    #[test]
    fn test_missing_scaffold_is_silent() {
        let mut widget = widget_on(HeadlessPage::with_regions(&[Region::Badge]));
        widget.handle(&buy_click("tshirt", "2000")).unwrap();
        assert_eq!(widget.page().text(Region::Badge), Some("1"));
        assert_eq!(widget.page().html(Region::MiniCartList), None);

        let open = PageEvent::click(vec![card("tshirt", "2000")]);
        assert_eq!(widget.handle(&open).unwrap(), DispatchOutcome::Ignored);
        assert!(!widget.modal().is_open());
    }

    #[test]
    fn test_failed_write_shows_notice_and_keeps_views() {
        let storage = MemoryStorage::with_quota(Some(150));
        let mut widget = CartWidget::new(CartStore::new(storage, KEY), HeadlessPage::full());
        widget.mount().unwrap();
        widget.add(item("a", 100, 1)).unwrap();
        let mut events = widget.subscribe();

        let big = CartItem {
            title: "x".repeat(400),
            ..item("b", 100, 1)
        };
        let err = widget.add(big).unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(
            widget.page().text(Region::Notice),
            Some("Не удалось сохранить корзину")
        );
        assert_eq!(widget.page().text(Region::Badge), Some("1"));
        assert!(events.try_recv().is_err());
        assert!(!widget.page().is_hidden(Region::Notice));

        widget.add(item("a", 100, 1)).unwrap();
        assert!(widget.page().is_hidden(Region::Notice));
        assert_eq!(widget.page().text(Region::Badge), Some("2"));
    }

    #[test]
    fn test_stored_sku_with_padding_can_be_removed() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                KEY,
                r#"{"items":[{"sku":" tshirt ","title":"Футболка","price":2000,"image":"","qty":1}]}"#,
            )
            .unwrap();
        let mut widget = CartWidget::new(CartStore::new(storage, KEY), HeadlessPage::full());
        widget.mount().unwrap();
        let drawer = widget.page().html(Region::DrawerList).unwrap();
        assert!(drawer.contains(r#"data-sku="tshirt""#));

        let remove = Element::new()
            .with_class("js-remove")
            .with_attr("data-sku", "tshirt");
        widget.handle(&PageEvent::click(vec![remove])).unwrap();
        assert!(widget.read().is_empty());
        assert_eq!(widget.page().text(Region::DrawerTotal), Some("0\u{a0}₽"));
    }

    #[test]
    fn test_storage_change_from_other_tab() {
        let storage = MemoryStorage::new();
        let other_tab = CartStore::new(storage.open_tab(), KEY);
        let mut widget =
            CartWidget::new(CartStore::new(storage.clone(), KEY), HeadlessPage::full());
        widget.mount().unwrap();
        let mut tab_events = storage.subscribe();
        let mut cart_events = widget.subscribe();

        other_tab.add_item(item("a", 100, 4)).unwrap();
        let change = tab_events.try_next().unwrap();
        widget.handle(&PageEvent::StorageChanged(change)).unwrap();

        assert_eq!(widget.page().text(Region::Badge), Some("4"));
        assert_eq!(
            cart_events.try_recv().unwrap(),
            CartEvent::Updated {
                item_count: 4,
                source: UpdateSource::OtherTab
            }
        );
    }

    #[test]
    fn test_unrelated_storage_key_is_ignored() {
        let mut widget = widget();
        let change = StorageChange {
            key: "theme".to_string(),
            old_value: None,
            new_value: Some("dark".to_string()),
            origin: crate::storage::TabId::new(),
        };
        assert!(!widget.handle_storage_change(&change).unwrap());
    }
}
