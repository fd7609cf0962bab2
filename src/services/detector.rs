//! Layout detection service.
//!
//! Tries each layout of the catalog against a document, in priority order,
//! and commits to the first one whose card selector matches anything.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::LayoutDefinition;
use crate::utils::parse_selector;

/// A layout with its selectors parsed once up front.
#[derive(Debug)]
pub struct CompiledLayout {
    pub definition: LayoutDefinition,
    pub(crate) card: Selector,
    pub(crate) title: Option<Selector>,
    pub(crate) price: Option<Selector>,
    pub(crate) currency: Option<Selector>,
    pub(crate) address: Option<Selector>,
    pub(crate) attributes: Option<Selector>,
    pub(crate) link: Option<Selector>,
}

impl CompiledLayout {
    /// Parse every selector of a layout definition.
    pub fn compile(definition: LayoutDefinition) -> Result<Self> {
        if definition.card_selector.trim().is_empty() {
            return Err(AppError::config(format!(
                "layout '{}' has no card selector",
                definition.name
            )));
        }

        Ok(Self {
            card: parse_selector(&definition.card_selector)?,
            title: optional_selector(&definition.title_selector)?,
            price: optional_selector(&definition.price_selector)?,
            currency: optional_selector(definition.currency().unwrap_or(""))?,
            address: optional_selector(&definition.address_selector)?,
            attributes: optional_selector(&definition.attributes_selector)?,
            link: optional_selector(&definition.link_selector)?,
            definition,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

fn optional_selector(s: &str) -> Result<Option<Selector>> {
    let s = s.trim();
    if s.is_empty() {
        Ok(None)
    } else {
        parse_selector(s).map(Some)
    }
}

/// The committed layout for a document, with the cards it matched.
#[derive(Debug)]
pub struct Detection<'a> {
    pub layout: &'a CompiledLayout,
    pub cards: Vec<ElementRef<'a>>,
}

/// Service for picking the layout that fits a search results page.
#[derive(Debug)]
pub struct LayoutDetector {
    layouts: Vec<CompiledLayout>,
}

impl LayoutDetector {
    /// Create a detector over an ordered catalog.
    pub fn new(catalog: Vec<LayoutDefinition>) -> Result<Self> {
        let layouts = catalog
            .into_iter()
            .map(CompiledLayout::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { layouts })
    }

    /// Layouts in priority order.
    pub fn layouts(&self) -> &[CompiledLayout] {
        &self.layouts
    }

    /// Commit to the first layout with at least one card on the page.
    pub fn detect<'a>(&'a self, document: &'a Html) -> Result<Detection<'a>> {
        self.layouts
            .iter()
            .find_map(|layout| {
                let cards: Vec<_> = document.select(&layout.card).collect();
                if cards.is_empty() {
                    log::debug!("Layout '{}' matched no cards", layout.name());
                    return None;
                }
                log::info!(
                    "Compatible layout found: {} ({} cards)",
                    layout.name(),
                    cards.len()
                );
                Some(Detection { layout, cards })
            })
            .ok_or(AppError::LayoutNotRecognized)
    }
}

impl Default for LayoutDetector {
    fn default() -> Self {
        let layouts = LayoutDefinition::builtin_catalog()
            .into_iter()
            .filter_map(|definition| CompiledLayout::compile(definition).ok())
            .collect();
        Self { layouts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MERCADO_LIBRE: &str = r#"
        <ol>
          <li class="ui-search-result__wrapper"><h2 class="ui-search-item__title">A</h2></li>
          <li class="ui-search-result__wrapper"><h2 class="ui-search-item__title">B</h2></li>
        </ol>"#;

    const ZONAPROP: &str = r#"
        <div data-qa="posting-card"><h2>Casa</h2></div>"#;

    const GENERIC: &str = r#"
        <article class="listing"><h3>Loft</h3></article>"#;

    #[test]
    fn test_default_detector_has_builtin_layouts() {
        let detector = LayoutDetector::default();
        assert_eq!(detector.layouts().len(), 3);
    }

    #[test]
    fn test_detects_first_layout() {
        let detector = LayoutDetector::default();
        let document = Html::parse_document(MERCADO_LIBRE);
        let detection = detector.detect(&document).unwrap();
        assert_eq!(detection.layout.name(), "Mercado Libre");
        assert_eq!(detection.cards.len(), 2);
    }

    #[test]
    fn test_detects_each_layout_when_earlier_ones_miss() {
        let detector = LayoutDetector::default();
        for (html, expected) in [
            (ZONAPROP, "Zonaprop/Argenprop"),
            (GENERIC, "Generic"),
        ] {
            let document = Html::parse_document(html);
            assert_eq!(detector.detect(&document).unwrap().layout.name(), expected);
        }
    }

    #[test]
    fn test_earlier_layout_wins_over_generic() {
        // The posting card also carries a generic class; priority must pick entry 2.
        let html = r#"
            <div data-qa="posting-card" class="property-card"><h2>Casa</h2></div>
            <article class="listing"><h3>Loft</h3></article>"#;
        let detector = LayoutDetector::default();
        let document = Html::parse_document(html);
        let detection = detector.detect(&document).unwrap();
        assert_eq!(detection.layout.name(), "Zonaprop/Argenprop");
        assert_eq!(detection.cards.len(), 1);
    }

    #[test]
    fn test_no_layout_matches() {
        let detector = LayoutDetector::default();
        let document = Html::parse_document("<html><body><p>Nothing here</p></body></html>");
        assert!(matches!(
            detector.detect(&document),
            Err(AppError::LayoutNotRecognized)
        ));
    }

    #[test]
    fn test_new_rejects_invalid_selector() {
        let mut layout = LayoutDefinition::builtin_catalog().remove(0);
        layout.title_selector = "[[bad".to_string();
        assert!(matches!(
            LayoutDetector::new(vec![layout]),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn test_empty_field_selectors_compile_to_none() {
        let layout = LayoutDefinition::builtin_catalog().remove(1);
        let compiled = CompiledLayout::compile(layout).unwrap();
        assert!(compiled.currency.is_none());
        assert!(compiled.title.is_some());
    }
}
