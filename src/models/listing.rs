//! Listing record data structure.

use serde::{Deserialize, Serialize};

/// Placeholder used when a card has no title element.
pub const TITLE_PLACEHOLDER: &str = "Title not found";
/// Placeholder used when a card has no price element.
pub const PRICE_PLACEHOLDER: &str = "Price not specified";
/// Placeholder used when a card has no address element.
pub const ADDRESS_PLACEHOLDER: &str = "Location not specified";
/// Placeholder used when a card has no attributes element.
pub const ATTRIBUTES_PLACEHOLDER: &str = "No additional features";

/// A property listing extracted from one card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingRecord {
    /// Listing title
    pub title: String,

    /// Location text
    pub address: String,

    /// Price with grouping separators removed
    pub price: String,

    /// Currency symbol or code (empty if the layout has none)
    pub currency: String,

    /// Features, whitespace collapsed
    pub attributes: String,

    /// Absolute URL to the listing, or empty
    pub url: String,
}

impl ListingRecord {
    /// Flatten the record into the labeled text handed to indexing.
    pub fn description(&self) -> String {
        format!(
            "Property: {}\nLocation: {}\nPrice: {} {}\nFeatures: {}\nLink: {}",
            self.title, self.address, self.currency, self.price, self.attributes, self.url
        )
        .trim()
        .to_string()
    }

    /// Whether any field fell back to its placeholder.
    pub fn has_placeholders(&self) -> bool {
        self.title == TITLE_PLACEHOLDER
            || self.price == PRICE_PLACEHOLDER
            || self.address == ADDRESS_PLACEHOLDER
            || self.attributes == ATTRIBUTES_PLACEHOLDER
    }
}

/// Ordered records from one page, in document order.
pub type Batch = Vec<ListingRecord>;
