//! Cart commands: inspect and change the stored cart.
//!
//! # Usage
//!
//! ```bash
//! bcart add --sku hoodie --title "Худи" --price 4500 --image img/hoodie.jpg --qty 2
//! bcart dec hoodie
//! bcart remove hoodie
//! bcart show
//! ```

use std::io::Write;

use banda_core::{CartItem, Price, Quantity, Sku};
use banda_storefront::Region;
use banda_storefront::views::CartView;

use super::{CliError, Widget};

/// Arguments of `bcart add`.
#[derive(Debug)]
pub struct NewItem<'a> {
    pub sku: &'a str,
    pub title: &'a str,
    pub price: &'a str,
    pub image: &'a str,
    pub qty: u32,
}

/// Print the drawer as a table, or as its HTML fragment.
pub fn show(widget: &Widget, html: bool, out: &mut impl Write) -> Result<(), CliError> {
    if html {
        let fragment = widget.page().html(Region::DrawerList).unwrap_or_default();
        writeln!(out, "{fragment}")?;
        return Ok(());
    }

    let view = CartView::from(&widget.read());
    if view.is_empty() {
        writeln!(out, "Корзина пуста")?;
        return Ok(());
    }
    for row in &view.rows {
        writeln!(
            out,
            "{}\t{}\t{} × {}\t{}",
            row.sku, row.title, row.unit_price, row.qty, row.line_total
        )?;
    }
    writeln!(out, "Итого: {}", view.total)?;
    Ok(())
}

/// Print the badge count.
pub fn badge(widget: &Widget, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", widget.read().item_count())?;
    Ok(())
}

/// Add a product.
pub fn add(widget: &mut Widget, new: &NewItem<'_>, out: &mut impl Write) -> Result<(), CliError> {
    let item = CartItem {
        sku: Sku::parse(new.sku)?,
        title: new.title.to_string(),
        price: new.price.parse::<Price>()?,
        image: new.image.to_string(),
        qty: Quantity::new(new.qty),
    };
    let sku = item.sku.clone();
    widget.add(item)?;
    tracing::info!(%sku, "Added to cart");
    print_summary(widget, out)
}

/// Remove a line.
pub fn remove(widget: &mut Widget, sku: &str, out: &mut impl Write) -> Result<(), CliError> {
    let sku = Sku::parse(sku)?;
    widget.remove(&sku)?;
    print_summary(widget, out)
}

/// Step a line's quantity by `delta`.
pub fn step(
    widget: &mut Widget,
    sku: &str,
    delta: i64,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let sku = Sku::parse(sku)?;
    if !widget.set_quantity(&sku, delta)? {
        return Err(CliError::NotInCart(sku.into_inner()));
    }
    print_summary(widget, out)
}

/// Set a line's quantity. Input is parsed the way the quantity field is.
pub fn set(
    widget: &mut Widget,
    sku: &str,
    qty: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let sku = Sku::parse(sku)?;
    if !widget.set_line_quantity(&sku, Quantity::parse_lenient(qty))? {
        return Err(CliError::NotInCart(sku.into_inner()));
    }
    print_summary(widget, out)
}

/// Empty the cart.
pub fn clear(widget: &mut Widget, out: &mut impl Write) -> Result<(), CliError> {
    widget.clear()?;
    print_summary(widget, out)
}

/// One line with the badge count and the total, as the page shows them.
pub(crate) fn print_summary(widget: &Widget, out: &mut impl Write) -> Result<(), CliError> {
    let page = widget.page();
    let count = if page.is_hidden(Region::Badge) {
        "0"
    } else {
        page.text(Region::Badge).unwrap_or("0")
    };
    let total = page.text(Region::DrawerTotal).unwrap_or_default();
    writeln!(out, "Товаров: {count}, итого: {total}")?;
    Ok(())
}
