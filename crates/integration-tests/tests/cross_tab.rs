//! Several tabs sharing one store.

#![allow(clippy::unwrap_used)]

use banda_core::Sku;
use banda_integration_tests::{Browser, buy_button_path, line, product_card, sku_control};
use banda_storefront::{CartEvent, PageSurface, Region, UpdateSource};
use proptest::prelude::*;

#[test]
fn test_write_in_one_tab_shows_in_the_other() {
    let browser = Browser::new();
    let mut first = browser.open_tab().unwrap();
    let mut second = browser.open_tab().unwrap();

    first.click(buy_button_path(product_card("longsleeve", "Лонгслив", "3100"))).unwrap();
    assert_eq!(second.badge(), None);

    assert_eq!(second.sync().unwrap(), 1);
    assert_eq!(second.badge(), Some("1"));
    assert_eq!(second.text(Region::MiniCartTotal), "3\u{a0}100\u{a0}₽");
    assert!(second.widget.page().is_open(Region::MiniCart));
    assert_eq!(
        second.notifications(),
        vec![CartEvent::Updated {
            item_count: 1,
            source: UpdateSource::OtherTab
        }]
    );

    // The writing tab never hears its own change back.
    assert_eq!(first.sync().unwrap(), 0);
}

#[test]
fn test_tabs_interleave_edits() {
    let browser = Browser::new();
    let mut first = browser.open_tab().unwrap();
    let mut second = browser.open_tab().unwrap();

    first.widget.add(line("a", 1000, 1)).unwrap();
    second.sync().unwrap();
    second.click(vec![sku_control("js-inc", "a")]).unwrap();
    second.widget.add(line("b", 500, 1)).unwrap();

    // Every mutator reads fresh, so the first tab builds on the second's edits
    // even before it syncs.
    first.click(vec![sku_control("js-inc", "a")]).unwrap();
    assert_eq!(first.widget.read().item_count(), 4);

    second.sync().unwrap();
    assert_eq!(second.badge(), Some("4"));
    assert_eq!(second.text(Region::DrawerTotal), "3\u{a0}500\u{a0}₽");
}

#[test]
fn test_removal_in_other_tab_hides_mini_cart() {
    let browser = Browser::new();
    let mut first = browser.open_tab().unwrap();
    let mut second = browser.open_tab().unwrap();

    first.widget.add(line("a", 1000, 1)).unwrap();
    second.sync().unwrap();
    assert!(second.widget.page().is_open(Region::MiniCart));

    first.widget.remove(&Sku::parse("a").unwrap()).unwrap();
    second.sync().unwrap();
    assert!(!second.widget.page().is_open(Region::MiniCart));
    assert_eq!(second.badge(), None);
}

#[test]
fn test_clear_reaches_every_tab() {
    let browser = Browser::new();
    let mut tabs: Vec<_> = (0..3).map(|_| browser.open_tab().unwrap()).collect();

    tabs[0].widget.add(line("a", 100, 2)).unwrap();
    for tab in &mut tabs[1..] {
        tab.sync().unwrap();
        assert_eq!(tab.badge(), Some("2"));
    }

    tabs[2].widget.clear().unwrap();
    for tab in &mut tabs[..2] {
        tab.sync().unwrap();
        assert_eq!(tab.badge(), None);
    }
}

proptest! {
    #[test]
    fn prop_synced_tabs_agree(
        ops in prop::collection::vec((0usize..2, 0usize..3, -2i64..3), 1..20)
    ) {
        let browser = Browser::new();
        let mut tabs = [browser.open_tab().unwrap(), browser.open_tab().unwrap()];
        let skus = ["a", "b", "c"];

        for (tab, sku, delta) in ops {
            let tab = &mut tabs[tab];
            if delta == 0 {
                tab.widget.add(line(skus[sku], 100, 1)).unwrap();
            } else {
                tab.widget
                    .set_quantity(&Sku::parse(skus[sku]).unwrap(), delta)
                    .unwrap();
            }
        }
        for tab in &mut tabs {
            tab.sync().unwrap();
        }

        prop_assert_eq!(tabs[0].widget.read(), tabs[1].widget.read());
        prop_assert_eq!(tabs[0].badge(), tabs[1].badge());
        prop_assert_eq!(
            tabs[0].text(Region::DrawerTotal),
            tabs[1].text(Region::DrawerTotal)
        );
    }
}
