//! The page the widget draws on.
//!
//! [`PageSurface`] is the only way the widget touches the page. Every region
//! is optional: a page without a drawer simply reports `has(Region::Drawer)`
//! as `false` and the drawer renderer does nothing there.

use std::collections::HashMap;

/// A cart-related region of the page, identified by its element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Badge,
    MiniCart,
    MiniCartList,
    MiniCartTotal,
    Drawer,
    DrawerList,
    DrawerTotal,
    Modal,
    ModalContent,
    ModalQuantity,
    Notice,
}

impl Region {
    /// Every region, in document order.
    pub const ALL: [Self; 11] = [
        Self::Badge,
        Self::MiniCart,
        Self::MiniCartList,
        Self::MiniCartTotal,
        Self::Drawer,
        Self::DrawerList,
        Self::DrawerTotal,
        Self::Modal,
        Self::ModalContent,
        Self::ModalQuantity,
        Self::Notice,
    ];

    /// Element id the storefront markup uses for this region.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Badge => "cart-badge",
            Self::MiniCart => "mini-cart",
            Self::MiniCartList => "mini-cart-list",
            Self::MiniCartTotal => "mini-cart-total",
            Self::Drawer => "cart-drawer",
            Self::DrawerList => "drawer-cart-list",
            Self::DrawerTotal => "drawer-cart-total",
            Self::Modal => "product-modal",
            Self::ModalContent => "pm-content",
            Self::ModalQuantity => "pm-qty",
            Self::Notice => "cart-notice",
        }
    }

    /// Look a region up by element id.
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.element_id() == id)
    }
}

/// Operations the widget performs on the page.
///
/// Implementations must treat every call on an absent region as a no-op.
pub trait PageSurface {
    /// Whether the page has this region.
    fn has(&self, region: Region) -> bool;

    /// Replace the region's text content.
    fn set_text(&mut self, region: Region, text: &str);

    /// Replace the region's inner HTML.
    fn set_html(&mut self, region: Region, html: &str);

    /// Show or hide the region.
    fn set_hidden(&mut self, region: Region, hidden: bool);

    /// Add or remove the region's open state (`is-open`).
    fn set_open(&mut self, region: Region, open: bool);

    /// Whether the region is currently open. Absent regions are closed.
    fn is_open(&self, region: Region) -> bool;

    /// Lock or restore page scrolling behind an overlay.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Show a message to the shopper. Pages without a notice region drop it.
    fn show_notice(&mut self, message: &str) {
        if self.has(Region::Notice) {
            self.set_text(Region::Notice, message);
            self.set_hidden(Region::Notice, false);
        }
    }
}

/// State of one region on a [`HeadlessPage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionState {
    pub text: String,
    pub html: String,
    pub hidden: bool,
    pub open: bool,
}

/// An in-memory page for tests and terminal hosts.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    regions: HashMap<Region, RegionState>,
    scroll_locked: bool,
}

impl HeadlessPage {
    /// A page with every cart region.
    #[must_use]
    pub fn full() -> Self {
        Self::with_regions(&Region::ALL)
    }

    /// A page with only the given regions.
    #[must_use]
    pub fn with_regions(regions: &[Region]) -> Self {
        Self {
            regions: regions
                .iter()
                .map(|region| (*region, RegionState::default()))
                .collect(),
            scroll_locked: false,
        }
    }

    /// State of a region, if present.
    #[must_use]
    pub fn region(&self, region: Region) -> Option<&RegionState> {
        self.regions.get(&region)
    }

    /// Text content of a region, if present.
    #[must_use]
    pub fn text(&self, region: Region) -> Option<&str> {
        self.region(region).map(|state| state.text.as_str())
    }

    /// Inner HTML of a region, if present.
    #[must_use]
    pub fn html(&self, region: Region) -> Option<&str> {
        self.region(region).map(|state| state.html.as_str())
    }

    /// Whether a region is present and hidden.
    #[must_use]
    pub fn is_hidden(&self, region: Region) -> bool {
        self.region(region).is_some_and(|state| state.hidden)
    }

    /// Whether page scrolling is locked.
    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}

impl PageSurface for HeadlessPage {
    fn has(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    fn set_text(&mut self, region: Region, text: &str) {
        if let Some(state) = self.regions.get_mut(&region) {
            text.clone_into(&mut state.text);
        }
    }

    fn set_html(&mut self, region: Region, html: &str) {
        if let Some(state) = self.regions.get_mut(&region) {
            html.clone_into(&mut state.html);
        }
    }

    fn set_hidden(&mut self, region: Region, hidden: bool) {
        if let Some(state) = self.regions.get_mut(&region) {
            state.hidden = hidden;
        }
    }

    fn set_open(&mut self, region: Region, open: bool) {
        if let Some(state) = self.regions.get_mut(&region) {
            state.open = open;
        }
    }

    fn is_open(&self, region: Region) -> bool {
        self.region(region).is_some_and(|state| state.open)
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::from_element_id(region.element_id()), Some(region));
        }
        assert_eq!(Region::from_element_id("footer"), None);
    }

    #[test]
    fn test_absent_regions_are_noops() {
        let mut page = HeadlessPage::with_regions(&[Region::Badge]);
        page.set_text(Region::Drawer, "x");
        page.set_open(Region::Drawer, true);
        assert!(!page.has(Region::Drawer));
        assert!(!page.is_open(Region::Drawer));
        assert_eq!(page.text(Region::Drawer), None);

        page.set_text(Region::Badge, "3");
        assert_eq!(page.text(Region::Badge), Some("3"));
    }

    #[test]
    fn test_notice_needs_region() {
        let mut bare = HeadlessPage::with_regions(&[]);
        bare.show_notice("oops");
        assert_eq!(bare.text(Region::Notice), None);

        let mut page = HeadlessPage::full();
        page.set_hidden(Region::Notice, true);
        page.show_notice("oops");
        assert_eq!(page.text(Region::Notice), Some("oops"));
        assert!(!page.is_hidden(Region::Notice));
    }
}
