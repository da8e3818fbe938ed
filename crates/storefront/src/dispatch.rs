//! Role-based event dispatch.
//!
//! Page events arrive with the target element and its ancestors. Elements are
//! tagged with [`ElementRole`]s (derived from the storefront's class names,
//! marker attributes and ids), and [`ROUTES`] maps roles to [`ActionId`]s.
//! [`resolve`] turns an event into a fully-populated [`Action`] for the widget
//! to perform.
//!
//! Resolution walks from the target outwards; the innermost element carrying a
//! routed role wins, and within one element the earlier route wins. This is
//! what keeps a click on a card's buy button from also opening the card's
//! modal.

use std::collections::BTreeMap;

use banda_core::{Quantity, Sku};

use crate::catalog::ProductCard;
use crate::storage::StorageChange;

/// What an element does in the cart UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// Catalog card holding product `data-*` attributes (`.card`).
    ProductCard,
    /// Card that opens the product modal (`.js-product`).
    ProductTrigger,
    /// Catalog buy button (`.js-add-to-cart`).
    AddToCart,
    /// Mini-cart close button (`.mini-cart__close`).
    MiniCartClose,
    /// Mini-cart row remove button (`.js-mini-remove`).
    MiniCartRemove,
    /// Anything that opens the drawer (`.js-open-cart`).
    OpenCart,
    /// Drawer close target (`[data-cart-close]`).
    DrawerClose,
    /// Drawer row `+` (`.js-inc`).
    LineIncrement,
    /// Drawer row `−` (`.js-dec`).
    LineDecrement,
    /// Drawer row quantity field (`.js-qty`).
    LineQuantity,
    /// Drawer row remove button (`.js-remove`).
    LineRemove,
    /// Modal close target (`[data-close]`).
    ModalClose,
    /// Modal `+` (`#pm-inc`).
    ModalIncrement,
    /// Modal `−` (`#pm-dec`).
    ModalDecrement,
    /// Modal quantity field (`#pm-qty`).
    ModalQuantity,
    /// Modal buy button (`#pm-buy`).
    ModalBuy,
}

impl ElementRole {
    /// Role implied by a class token.
    #[must_use]
    pub fn from_class(class: &str) -> Option<Self> {
        Some(match class {
            "card" => Self::ProductCard,
            "js-product" => Self::ProductTrigger,
            "js-add-to-cart" => Self::AddToCart,
            "mini-cart__close" => Self::MiniCartClose,
            "js-mini-remove" => Self::MiniCartRemove,
            "js-open-cart" => Self::OpenCart,
            "js-inc" => Self::LineIncrement,
            "js-dec" => Self::LineDecrement,
            "js-qty" => Self::LineQuantity,
            "js-remove" => Self::LineRemove,
            _ => return None,
        })
    }

    /// Role implied by a marker attribute.
    #[must_use]
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "data-cart-close" => Some(Self::DrawerClose),
            "data-close" => Some(Self::ModalClose),
            _ => None,
        }
    }

    /// Role implied by an element id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "pm-inc" => Some(Self::ModalIncrement),
            "pm-dec" => Some(Self::ModalDecrement),
            "pm-qty" => Some(Self::ModalQuantity),
            "pm-buy" => Some(Self::ModalBuy),
            _ => None,
        }
    }
}

/// A page element as seen by the dispatcher: its roles and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    roles: Vec<ElementRole>,
    attributes: BTreeMap<String, String>,
}

impl Element {
    /// An element with no roles or attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role explicitly.
    #[must_use]
    pub fn with_role(mut self, role: ElementRole) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Add the roles implied by a `class` attribute value.
    #[must_use]
    pub fn with_class(self, classes: &str) -> Self {
        classes
            .split_whitespace()
            .filter_map(ElementRole::from_class)
            .fold(self, Self::with_role)
    }

    /// Add the role implied by an element id.
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        match ElementRole::from_id(id) {
            Some(role) => self.with_role(role),
            None => self,
        }
    }

    /// Set an attribute, adding the role it implies, if any.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        match ElementRole::from_attribute(name) {
            Some(role) => self.with_role(role),
            None => self,
        }
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the element carries `role`.
    #[must_use]
    pub fn has_role(&self, role: ElementRole) -> bool {
        self.roles.contains(&role)
    }

    fn sku(&self) -> Option<Sku> {
        self.attr("data-sku").and_then(|raw| Sku::parse(raw).ok())
    }
}

/// Keys the widget reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        if key == "Escape" {
            Self::Escape
        } else {
            Self::Other(key.to_string())
        }
    }
}

/// An event delivered to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A click; `path` starts at the target and ends at the outermost ancestor.
    Click { path: Vec<Element> },
    /// A field's value changed.
    Input { path: Vec<Element>, value: String },
    /// A key was pressed anywhere on the page.
    KeyDown(Key),
    /// Another tab changed the store.
    StorageChanged(StorageChange),
}

impl PageEvent {
    /// Convenience constructor for clicks.
    #[must_use]
    pub const fn click(path: Vec<Element>) -> Self {
        Self::Click { path }
    }
}

/// Handler identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    AddToCart,
    OpenProduct,
    CloseMiniCart,
    RemoveFromMiniCart,
    OpenDrawer,
    CloseDrawer,
    IncrementLine,
    DecrementLine,
    SetLineQuantity,
    RemoveFromDrawer,
    CloseModal,
    ModalIncrement,
    ModalDecrement,
    ModalSetQuantity,
    ModalBuy,
    SyncFromStorage,
}

/// A resolved action with everything its handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddToCart(ProductCard),
    OpenProduct(ProductCard),
    CloseMiniCart,
    RemoveFromMiniCart(Sku),
    OpenDrawer,
    CloseDrawer,
    IncrementLine(Sku),
    DecrementLine(Sku),
    SetLineQuantity { sku: Sku, qty: Quantity },
    RemoveFromDrawer(Sku),
    CloseModal,
    ModalIncrement,
    ModalDecrement,
    ModalSetQuantity(String),
    ModalBuy,
    SyncFromStorage(StorageChange),
}

impl Action {
    /// The handler this action is routed to.
    #[must_use]
    pub const fn id(&self) -> ActionId {
        match self {
            Self::AddToCart(_) => ActionId::AddToCart,
            Self::OpenProduct(_) => ActionId::OpenProduct,
            Self::CloseMiniCart => ActionId::CloseMiniCart,
            Self::RemoveFromMiniCart(_) => ActionId::RemoveFromMiniCart,
            Self::OpenDrawer => ActionId::OpenDrawer,
            Self::CloseDrawer => ActionId::CloseDrawer,
            Self::IncrementLine(_) => ActionId::IncrementLine,
            Self::DecrementLine(_) => ActionId::DecrementLine,
            Self::SetLineQuantity { .. } => ActionId::SetLineQuantity,
            Self::RemoveFromDrawer(_) => ActionId::RemoveFromDrawer,
            Self::CloseModal => ActionId::CloseModal,
            Self::ModalIncrement => ActionId::ModalIncrement,
            Self::ModalDecrement => ActionId::ModalDecrement,
            Self::ModalSetQuantity(_) => ActionId::ModalSetQuantity,
            Self::ModalBuy => ActionId::ModalBuy,
            Self::SyncFromStorage(_) => ActionId::SyncFromStorage,
        }
    }
}

/// How far up the path a route looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the event target itself.
    Target,
    /// The target or any ancestor.
    Closest,
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub role: ElementRole,
    pub scope: Scope,
    pub action: ActionId,
}

const fn route(role: ElementRole, scope: Scope, action: ActionId) -> Route {
    Route {
        role,
        scope,
        action,
    }
}

/// Click routes, in priority order.
pub const ROUTES: &[Route] = &[
    route(ElementRole::AddToCart, Scope::Closest, ActionId::AddToCart),
    route(ElementRole::MiniCartRemove, Scope::Closest, ActionId::RemoveFromMiniCart),
    route(ElementRole::MiniCartClose, Scope::Closest, ActionId::CloseMiniCart),
    route(ElementRole::OpenCart, Scope::Closest, ActionId::OpenDrawer),
    route(ElementRole::DrawerClose, Scope::Target, ActionId::CloseDrawer),
    route(ElementRole::LineIncrement, Scope::Closest, ActionId::IncrementLine),
    route(ElementRole::LineDecrement, Scope::Closest, ActionId::DecrementLine),
    route(ElementRole::LineRemove, Scope::Closest, ActionId::RemoveFromDrawer),
    route(ElementRole::ModalClose, Scope::Target, ActionId::CloseModal),
    route(ElementRole::ModalIncrement, Scope::Closest, ActionId::ModalIncrement),
    route(ElementRole::ModalDecrement, Scope::Closest, ActionId::ModalDecrement),
    route(ElementRole::ModalBuy, Scope::Closest, ActionId::ModalBuy),
    route(ElementRole::ProductTrigger, Scope::Closest, ActionId::OpenProduct),
];

/// Input routes, in priority order.
pub const INPUT_ROUTES: &[Route] = &[
    route(ElementRole::LineQuantity, Scope::Closest, ActionId::SetLineQuantity),
    route(ElementRole::ModalQuantity, Scope::Closest, ActionId::ModalSetQuantity),
];

/// Turn a page event into an action, if any handler wants it.
#[must_use]
pub fn resolve(event: &PageEvent) -> Option<Action> {
    match event {
        PageEvent::Click { path } => {
            let (depth, id) = match_route(ROUTES, path)?;
            build_click(id, depth, path)
        }
        PageEvent::Input { path, value } => {
            let (depth, id) = match_route(INPUT_ROUTES, path)?;
            build_input(id, depth, path, value)
        }
        PageEvent::KeyDown(Key::Escape) => Some(Action::CloseModal),
        PageEvent::KeyDown(Key::Other(_)) => None,
        PageEvent::StorageChanged(change) => Some(Action::SyncFromStorage(change.clone())),
    }
}

/// Find the innermost element on `path` matched by a route.
fn match_route(routes: &[Route], path: &[Element]) -> Option<(usize, ActionId)> {
    path.iter().enumerate().find_map(|(depth, element)| {
        routes
            .iter()
            .filter(|route| route.scope == Scope::Closest || depth == 0)
            .find(|route| element.has_role(route.role))
            .map(|route| (depth, route.action))
    })
}

fn build_click(id: ActionId, depth: usize, path: &[Element]) -> Option<Action> {
    let element = path.get(depth)?;
    let action = match id {
        ActionId::AddToCart => {
            let card = path
                .iter()
                .skip(depth)
                .find(|el| el.has_role(ElementRole::ProductCard))?;
            Action::AddToCart(product_from(card)?)
        }
        ActionId::OpenProduct => Action::OpenProduct(product_from(element)?),
        ActionId::RemoveFromMiniCart => Action::RemoveFromMiniCart(element.sku()?),
        ActionId::CloseMiniCart => Action::CloseMiniCart,
        ActionId::OpenDrawer => Action::OpenDrawer,
        ActionId::CloseDrawer => Action::CloseDrawer,
        ActionId::IncrementLine => Action::IncrementLine(element.sku()?),
        ActionId::DecrementLine => Action::DecrementLine(element.sku()?),
        ActionId::RemoveFromDrawer => Action::RemoveFromDrawer(element.sku()?),
        ActionId::CloseModal => Action::CloseModal,
        ActionId::ModalIncrement => Action::ModalIncrement,
        ActionId::ModalDecrement => Action::ModalDecrement,
        ActionId::ModalBuy => Action::ModalBuy,
        ActionId::SetLineQuantity | ActionId::ModalSetQuantity | ActionId::SyncFromStorage => {
            return None;
        }
    };
    Some(action)
}

fn build_input(id: ActionId, depth: usize, path: &[Element], value: &str) -> Option<Action> {
    let element = path.get(depth)?;
    match id {
        ActionId::SetLineQuantity => Some(Action::SetLineQuantity {
            sku: element.sku()?,
            qty: Quantity::parse_lenient(value),
        }),
        ActionId::ModalSetQuantity => Some(Action::ModalSetQuantity(value.to_string())),
        _ => None,
    }
}

fn product_from(element: &Element) -> Option<ProductCard> {
    ProductCard::from_element(element)
        .inspect_err(|e| tracing::debug!(error = %e, "Ignoring click on unusable product card"))
        .ok()
}
