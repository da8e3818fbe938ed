//! HTML fragment templates for the cart regions.
//!
//! Each template renders the full contents of one region; the caller replaces
//! whatever the region held before. Interpolated values are HTML-escaped.

use askama::Template;

use crate::views::{CartView, ModalView};

/// Mini-cart popover rows.
#[derive(Template)]
#[template(path = "partials/mini_cart_items.html")]
pub struct MiniCartItemsTemplate<'a> {
    pub cart: &'a CartView,
}

/// Drawer rows with quantity steppers.
#[derive(Template)]
#[template(path = "partials/drawer_items.html")]
pub struct DrawerItemsTemplate<'a> {
    pub cart: &'a CartView,
}

/// Product modal body.
#[derive(Template)]
#[template(path = "partials/product_modal.html")]
pub struct ProductModalTemplate<'a> {
    pub modal: &'a ModalView,
}
