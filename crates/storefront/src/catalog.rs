//! Product cards and the static description table.

use std::collections::HashMap;

use banda_core::{CartItem, Price, Quantity, Sku};

use crate::dispatch::Element;
use crate::error::{CartError, Result};

/// Descriptions shown in the product modal, keyed by SKU.
const DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "tshirt",
        "Белая, оверсайз, хлопок. Аккуратно сидит и держит форму.",
    ),
    ("hoodie", "Белое оверсайз худи. Мягкий флис внутри."),
    ("zip-hoodie", "Белое оверсайз зип-худи на молнии."),
    ("longsleeve", "Белый лонгслив, оверсайз посадка, базовая модель."),
];

/// Product data read from a card's `data-*` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub sku: Sku,
    pub title: String,
    pub price: Price,
    pub image: String,
}

impl ProductCard {
    /// Read `data-sku`, `data-title`, `data-price` and `data-image`.
    ///
    /// Only the SKU is required. A missing title or image becomes empty and an
    /// unusable price becomes zero.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidProduct` if `data-sku` is missing or blank.
    pub fn from_element(element: &Element) -> Result<Self> {
        let raw_sku = element
            .attr("data-sku")
            .ok_or_else(|| CartError::InvalidProduct("missing data-sku".to_string()))?;
        let sku = Sku::parse(raw_sku).map_err(|e| CartError::InvalidProduct(e.to_string()))?;
        Ok(Self {
            sku,
            title: element.attr("data-title").unwrap_or_default().to_string(),
            price: Price::from_attribute(element.attr("data-price")),
            image: element.attr("data-image").unwrap_or_default().to_string(),
        })
    }

    /// Snapshot this product as a cart line.
    #[must_use]
    pub fn to_item(&self, qty: Quantity) -> CartItem {
        CartItem {
            sku: self.sku.clone(),
            title: self.title.clone(),
            price: self.price,
            image: self.image.clone(),
            qty,
        }
    }
}

/// Static product descriptions.
#[derive(Debug, Clone)]
pub struct Catalog {
    descriptions: HashMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_pairs(DESCRIPTIONS.iter().copied())
    }
}

impl Catalog {
    /// Build a catalog from `(sku, description)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            descriptions: pairs
                .into_iter()
                .map(|(sku, desc)| (sku.to_string(), desc.to_string()))
                .collect(),
        }
    }

    /// Description for a SKU; empty when the SKU is unknown.
    #[must_use]
    pub fn description(&self, sku: &Sku) -> &str {
        self.descriptions
            .get(sku.as_str())
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dispatch::ElementRole;

    fn card() -> Element {
        Element::new()
            .with_role(ElementRole::ProductCard)
            .with_attr("data-sku", "hoodie")
            .with_attr("data-title", "Худи")
            .with_attr("data-price", "4500")
            .with_attr("data-image", "img/hoodie.jpg")
    }

    #[test]
    fn test_from_element() {
        let product = ProductCard::from_element(&card()).unwrap();
        assert_eq!(product.sku.as_str(), "hoodie");
        assert_eq!(product.title, "Худи");
        assert_eq!(product.price, Price::from_rubles(4500));
        assert_eq!(product.image, "img/hoodie.jpg");
    }

    #[test]
    fn test_lenient_fields() {
        let element = Element::new()
            .with_attr("data-sku", "tshirt")
            .with_attr("data-price", "free");
        let product = ProductCard::from_element(&element).unwrap();
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.title, "");
        assert_eq!(product.image, "");
    }

    #[test]
    fn test_missing_sku() {
        let err = ProductCard::from_element(&Element::new()).unwrap_err();
        assert!(matches!(err, CartError::InvalidProduct(_)));
    }

    #[test]
    fn test_to_item_snapshot() {
        let product = ProductCard::from_element(&card()).unwrap();
        let item = product.to_item(Quantity::new(2));
        assert_eq!(item.qty.get(), 2);
        assert_eq!(item.line_total(), Price::from_rubles(9000));
    }

    #[test]
    fn test_descriptions() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.description(&Sku::parse("hoodie").unwrap()),
            "Белое оверсайз худи. Мягкий флис внутри."
        );
        assert_eq!(catalog.description(&Sku::parse("socks").unwrap()), "");
    }
}
