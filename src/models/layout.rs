// src/models/layout.rs

//! Layout definitions: CSS selectors for one family of listing sites.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping one site family's search results.
///
/// An empty selector means the field cannot be extracted for this layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutDefinition {
    /// Layout name for identification in logs
    pub name: String,

    /// Selector for each listing card on the page
    pub card_selector: String,

    /// Selector for the title element within a card
    #[serde(default)]
    pub title_selector: String,

    /// Selector for the price element within a card
    #[serde(default)]
    pub price_selector: String,

    /// Selector for the currency element within a card.
    /// Some sites embed the currency in the price text and have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_selector: Option<String>,

    /// Selector for the address element within a card
    #[serde(default)]
    pub address_selector: String,

    /// Selector for the features/attributes element within a card
    #[serde(default)]
    pub attributes_selector: String,

    /// Selector for the link element within a card
    #[serde(default)]
    pub link_selector: String,
}

impl LayoutDefinition {
    /// Currency selector, if the layout defines a non-empty one.
    pub fn currency(&self) -> Option<&str> {
        self.currency_selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The built-in catalog, most specific layouts first and the generic
    /// catch-all last.
    pub fn builtin_catalog() -> Vec<LayoutDefinition> {
        vec![
            LayoutDefinition {
                name: "Mercado Libre".to_string(),
                card_selector: ".ui-search-result__wrapper".to_string(),
                title_selector: ".ui-search-item__title".to_string(),
                price_selector: ".andes-money-amount__fraction".to_string(),
                currency_selector: Some(".andes-money-amount__currency-symbol".to_string()),
                address_selector: ".ui-search-item__location-location".to_string(),
                attributes_selector: ".ui-search-card-attributes".to_string(),
                link_selector: ".ui-search-link".to_string(),
            },
            LayoutDefinition {
                name: "Zonaprop/Argenprop".to_string(),
                card_selector: "div[data-qa='posting-card']".to_string(),
                title_selector: "h2".to_string(),
                price_selector: "div[data-qa='POSTING_CARD_PRICE']".to_string(),
                currency_selector: None,
                address_selector: "div[data-qa='POSTING_CARD_LOCATION']".to_string(),
                attributes_selector: "div[data-qa='POSTING_CARD_FEATURES']".to_string(),
                link_selector: "a[data-qa='posting-card-link']".to_string(),
            },
            LayoutDefinition {
                name: "Generic".to_string(),
                card_selector: "article.listing, div.property-card, div.listing-item"
                    .to_string(),
                title_selector: "h2, h3, .property-title".to_string(),
                price_selector: "[class*='price'], .price".to_string(),
                currency_selector: Some("[class*='currency']".to_string()),
                address_selector: "[class*='address'], .location".to_string(),
                attributes_selector: "[class*='features'], [class*='attributes']".to_string(),
                link_selector: "a".to_string(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_order() {
        let names: Vec<_> = LayoutDefinition::builtin_catalog()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, ["Mercado Libre", "Zonaprop/Argenprop", "Generic"]);
    }

    #[test]
    fn test_currency_treats_blank_as_absent() {
        let mut layout = LayoutDefinition::builtin_catalog().remove(0);
        assert!(layout.currency().is_some());

        layout.currency_selector = Some("  ".to_string());
        assert_eq!(layout.currency(), None);

        layout.currency_selector = None;
        assert_eq!(layout.currency(), None);
    }

    #[test]
    fn test_deserialize_without_currency() {
        let layout: LayoutDefinition = toml::from_str(
            r#"
            name = "Minimal"
            card_selector = "li.result"
            title_selector = "h4"
            "#,
        )
        .unwrap();
        assert_eq!(layout.currency(), None);
        assert!(layout.price_selector.is_empty());
    }
}
