//! HTML parser for extracting the title and outbound links
//!
//! Links come from `<a href="...">` only.

use scraper::{Html, Selector};
use url::Url;

/// Title and outbound links of one HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Trimmed text of the first `<title>`, if it has any
    pub title: Option<String>,

    /// Absolute http(s) link targets, in document order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts the title and links
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">`, resolved against `base_url`.
///
/// **Skip:** anchors carrying a `download` attribute, fragment-only hrefs,
/// the `javascript:`, `mailto:`, `tel:` and `data:` schemes, and anything that
/// does not resolve to an http(s) URL.
///
/// Links are not deduplicated; the crawler handles repeats.
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<title>Docs</title><a href="/start">Start</a><a href="mailto:x@y.z">Mail</a>"#;
/// let parsed = parse_html(html, &Url::parse("https://example.com/docs/").unwrap());
/// assert_eq!(parsed.title.as_deref(), Some("Docs"));
/// assert_eq!(parsed.links, vec!["https://example.com/start".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let title = document.select(&selector).next()?;
    let text = title.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Collects followable `<a href>` targets in document order
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|anchor| anchor.value().attr("download").is_none())
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves `href` against `base_url`; `None` for links the crawler never follows
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<title>TestTitle</title>
            <a href="https://example.com/1">linkText</a>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.title, Some("TestTitle".to_string()));
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_first_title_wins() {
        let html = r#"<html><head><title>First</title><title>Second</title></head></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.title, Some("First".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_links_in_document_order() {
        let html = r#"<title>TestTitle</title>
            <a href="https://example.com/1">linkText</a>
            <a href="https://example.com/2">linkText</a>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(
            parsed.links,
            vec![
                "https://example.com/1".to_string(),
                "https://example.com/2".to_string()
            ]
        );
    }

    #[test]
    fn test_extract_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links, vec!["https://example.com/other".to_string()]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let html = r#"<html><body><a href="other">Link</a></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links, vec!["https://example.com/other".to_string()]);
    }

    #[test]
    fn test_duplicate_links_are_kept() {
        let html = r#"<a href="/a">1</a><a href="/a">2</a>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links.len(), 2);
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"<html><body>
            <a href="javascript:void(0)">Js</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
            <a href="ftp://example.com/file">Ftp</a>
        </body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_skip_download_and_fragment_links() {
        let html = r##"<html><body>
            <a href="/file.pdf" download>Download</a>
            <a href="#section">Jump</a>
            <a href="">Empty</a>
        </body></html>"##;
        let parsed = parse_html(html, &base_url());
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="top">Top</a><a href="/x">X</a></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links, vec!["https://example.com/x".to_string()]);
    }
}
