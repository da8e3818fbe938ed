//! Print one rendered region of the page.

use std::io::Write;

use banda_storefront::{PageSurface, Region};
use clap::ValueEnum;

use super::{CliError, Widget};

/// Region printed by `bcart render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderTarget {
    Badge,
    MiniCart,
    Drawer,
}

/// Write the region as the widget last rendered it.
///
/// Closed or hidden regions are marked on their first line.
pub fn render(
    widget: &Widget,
    target: RenderTarget,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let page = widget.page();
    match target {
        RenderTarget::Badge => {
            let text = page.text(Region::Badge).unwrap_or_default();
            if page.is_hidden(Region::Badge) {
                writeln!(out, "{text} (hidden)")?;
            } else {
                writeln!(out, "{text}")?;
            }
        }
        RenderTarget::MiniCart => {
            if !page.is_open(Region::MiniCart) {
                writeln!(out, "(closed)")?;
            }
            write_list(
                out,
                page.html(Region::MiniCartList),
                page.text(Region::MiniCartTotal),
            )?;
        }
        RenderTarget::Drawer => {
            write_list(out, page.html(Region::DrawerList), page.text(Region::DrawerTotal))?;
        }
    }
    Ok(())
}

fn write_list(
    out: &mut impl Write,
    html: Option<&str>,
    total: Option<&str>,
) -> Result<(), CliError> {
    let html = html.unwrap_or_default().trim();
    if !html.is_empty() {
        writeln!(out, "{html}")?;
    }
    writeln!(out, "Итого: {}", total.unwrap_or_default())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::cart::{self, NewItem};
    use crate::commands::open_widget;
    use crate::commands::test_support::{output, temp_config};

    fn rendered(widget: &Widget, target: RenderTarget) -> String {
        let mut out = Vec::new();
        render(widget, target, &mut out).unwrap();
        output(&out)
    }

    #[test]
    fn test_empty_cart_regions() {
        let widget = open_widget(&temp_config()).unwrap();
        assert_eq!(rendered(&widget, RenderTarget::Badge), "0 (hidden)\n");
        assert_eq!(
            rendered(&widget, RenderTarget::MiniCart),
            "(closed)\nИтого: 0\u{a0}₽\n"
        );
    }

    #[test]
    fn test_filled_cart_regions() {
        let mut widget = open_widget(&temp_config()).unwrap();
        let item = NewItem {
            sku: "longsleeve",
            title: "Лонгслив <new>",
            price: "3100",
            image: "img/long.jpg",
            qty: 1,
        };
        cart::add(&mut widget, &item, &mut Vec::new()).unwrap();

        assert_eq!(rendered(&widget, RenderTarget::Badge), "1\n");

        let mini = rendered(&widget, RenderTarget::MiniCart);
        assert!(!mini.starts_with("(closed)"));
        assert!(mini.contains("js-mini-remove"));
        assert!(mini.contains("Лонгслив &#60;new&#62;") || mini.contains("Лонгслив &lt;new&gt;"));

        let drawer = rendered(&widget, RenderTarget::Drawer);
        assert!(drawer.contains("js-qty"));
        assert!(drawer.ends_with("Итого: 3\u{a0}100\u{a0}₽\n"));
    }
}
