//! Record extraction service.
//!
//! Turns matched cards into listing records using the committed layout only.
//! A missing sub-element never fails a card; the field gets its placeholder.

use scraper::{ElementRef, Selector};
use url::Url;

use crate::models::{
    ADDRESS_PLACEHOLDER, ATTRIBUTES_PLACEHOLDER, Batch, ListingRecord, PRICE_PLACEHOLDER,
    TITLE_PLACEHOLDER,
};
use crate::services::detector::{CompiledLayout, Detection};
use crate::utils::resolve_link;
use crate::utils::text::{collapse_whitespace, normalize_price};

/// Service for extracting listing records from cards.
pub struct RecordExtractor {
    base_url: Url,
}

impl RecordExtractor {
    /// Create an extractor resolving links against `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Extract every card of a detection, in document order.
    pub fn extract_detection(&self, detection: &Detection<'_>) -> Batch {
        self.extract(&detection.cards, detection.layout)
    }

    /// Extract one record per card, in the order given.
    pub fn extract(&self, cards: &[ElementRef<'_>], layout: &CompiledLayout) -> Batch {
        cards
            .iter()
            .map(|card| self.extract_card(*card, layout))
            .collect()
    }

    /// Extract a single card.
    pub fn extract_card(&self, card: ElementRef<'_>, layout: &CompiledLayout) -> ListingRecord {
        let title = first_text(card, layout.title.as_ref())
            .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

        let price = first_text(card, layout.price.as_ref())
            .map(|p| normalize_price(&p))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PRICE_PLACEHOLDER.to_string());

        let currency = first_text(card, layout.currency.as_ref()).unwrap_or_default();

        let address = first_text(card, layout.address.as_ref())
            .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string());

        let attributes = first_text(card, layout.attributes.as_ref())
            .map(|a| collapse_whitespace(&a))
            .unwrap_or_else(|| ATTRIBUTES_PLACEHOLDER.to_string());

        let url = first_element(card, layout.link.as_ref())
            .and_then(|el| el.value().attr("href"))
            .map(|href| resolve_link(href, &self.base_url))
            .unwrap_or_default();

        ListingRecord {
            title,
            address,
            price,
            currency,
            attributes,
            url,
        }
    }
}

fn first_element<'a>(card: ElementRef<'a>, selector: Option<&Selector>) -> Option<ElementRef<'a>> {
    selector.and_then(|sel| card.select(sel).next())
}

/// Trimmed text of the first match; `None` when absent or blank.
fn first_text(card: ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    first_element(card, selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LayoutDetector;
    use scraper::Html;

    fn extractor() -> RecordExtractor {
        RecordExtractor::new(Url::parse("https://site.test/search").unwrap())
    }

    #[test]
    fn test_full_card() {
        let html = r#"
            <div class="ui-search-result__wrapper">
              <a class="ui-search-link" href="/MLA-1">
                <h2 class="ui-search-item__title">  Depto en Palermo </h2>
              </a>
              <span class="andes-money-amount__currency-symbol">US$</span>
              <span class="andes-money-amount__fraction">1.250.000</span>
              <span class="ui-search-item__location-location">Palermo, CABA</span>
              <ul class="ui-search-card-attributes">
                <li>3 amb.</li>
                <li>75 m²</li>
              </ul>
            </div>"#;
        let detector = LayoutDetector::default();
        let document = Html::parse_document(html);
        let detection = detector.detect(&document).unwrap();
        let batch = extractor().extract_detection(&detection);

        assert_eq!(
            batch,
            vec![ListingRecord {
                title: "Depto en Palermo".to_string(),
                address: "Palermo, CABA".to_string(),
                price: "1250000".to_string(),
                currency: "US$".to_string(),
                attributes: "3 amb. 75 m²".to_string(),
                url: "https://site.test/MLA-1".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let html = r#"<article class="listing"><p>bare card</p></article>"#;
        let detector = LayoutDetector::default();
        let document = Html::parse_document(html);
        let detection = detector.detect(&document).unwrap();
        let record = &extractor().extract_detection(&detection)[0];

        assert_eq!(record.title, TITLE_PLACEHOLDER);
        assert_eq!(record.price, PRICE_PLACEHOLDER);
        assert_eq!(record.address, ADDRESS_PLACEHOLDER);
        assert_eq!(record.attributes, ATTRIBUTES_PLACEHOLDER);
        assert_eq!(record.currency, "");
        assert_eq!(record.url, "");
    }

    #[test]
    fn test_blank_title_uses_placeholder() {
        let html = r#"<article class="listing"><h2>   </h2></article>"#;
        let detector = LayoutDetector::default();
        let document = Html::parse_document(html);
        let detection = detector.detect(&document).unwrap();
        assert_eq!(
            extractor().extract_detection(&detection)[0].title,
            TITLE_PLACEHOLDER
        );
    }

    #[test]
    fn test_layout_without_currency_selector() {
        let html = r#"
            <div data-qa="posting-card">
              <h2>Casa quinta</h2>
              <div data-qa="POSTING_CARD_PRICE">USD 230.000</div>
              <span class="currency">USD</span>
            </div>"#;
        let detector = LayoutDetector::default();
        let document = Html::parse_document(html);
        let detection = detector.detect(&document).unwrap();
        let record = &extractor().extract_detection(&detection)[0];

        assert_eq!(record.currency, "");
        assert_eq!(record.price, "USD 230000");
    }

    #[test]
    fn test_absolute_link_kept() {
        let html = r#"
            <article class="listing">
              <a href="https://other.test/p/9">ver</a>
            </article>"#;
        let detector = LayoutDetector::default();
        let document = Html::parse_document(html);
        let detection = detector.detect(&document).unwrap();
        assert_eq!(
            extractor().extract_detection(&detection)[0].url,
            "https://other.test/p/9"
        );
    }

    #[test]
    fn test_preserves_document_order() {
        let html = r#"
            <article class="listing"><h2>first</h2></article>
            <article class="listing"><h2>second</h2></article>
            <article class="listing"><h2>third</h2></article>"#;
        let detector = LayoutDetector::default();
        let document = Html::parse_document(html);
        let detection = detector.detect(&document).unwrap();
        let titles: Vec<_> = extractor()
            .extract_detection(&detection)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }
}
