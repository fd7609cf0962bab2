//! Utility functions and helpers.

pub mod http;
pub mod text;

use scraper::Selector;
use url::Url;

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Turn a link `href` into an absolute URL.
///
/// Hrefs that already carry a scheme are returned unchanged; anything else is
/// joined onto `base`. Returns an empty string when nothing usable remains,
/// so a relative href is never passed through.
pub fn resolve_link(href: &str, base: &Url) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    match base.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            log::debug!("Dropping unresolvable link '{}' against {}: {}", href, base, e);
            String::new()
        }
    }
}

/// Extract the host from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div[data-qa='posting-card']").is_ok());
        assert!(parse_selector("[class*='price'], .price").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(matches!(
            parse_selector("[[invalid"),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn test_resolve_link_root_relative() {
        let base = Url::parse("https://site.test/search").unwrap();
        assert_eq!(resolve_link("/p/123", &base), "https://site.test/p/123");
    }

    #[test]
    fn test_resolve_link_absolute_unchanged() {
        let base = Url::parse("https://site.test/search").unwrap();
        let href = "https://other.test/listing/MLA-99?x=1";
        assert_eq!(resolve_link(href, &base), href);
    }

    #[test]
    fn test_resolve_link_relative_path() {
        let base = Url::parse("https://site.test/search/results").unwrap();
        assert_eq!(
            resolve_link("p/7.html", &base),
            "https://site.test/search/p/7.html"
        );
    }

    #[test]
    fn test_resolve_link_protocol_relative() {
        let base = Url::parse("https://site.test/search").unwrap();
        assert_eq!(
            resolve_link("//cdn.site.test/p/1", &base),
            "https://cdn.site.test/p/1"
        );
    }

    #[test]
    fn test_resolve_link_empty() {
        let base = Url::parse("https://site.test/").unwrap();
        assert_eq!(resolve_link("   ", &base), "");
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://inmuebles.site.test/venta"),
            Some("inmuebles.site.test".to_string())
        );
        assert_eq!(get_domain("not a url"), None);
    }
}
