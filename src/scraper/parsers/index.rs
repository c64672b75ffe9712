//! Listings index parser.
//!
//! The index links every event card from a single `table[width="98%"]`,
//! newest first.

use scraper::{Html, Selector};
use std::sync::OnceLock;

use super::element_text;
use crate::scraper::resolve_url;
use crate::types::IndexEntry;

fn link_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse(r#"table[width="98%"] a[href]"#).expect("index link selector"))
}

/// Parser for the event listings page
pub struct IndexPageParser;

impl IndexPageParser {
    /// Extract (display name, absolute URL) pairs in page order
    pub fn parse(html: &str, base_url: &str) -> Vec<IndexEntry> {
        let document = Html::parse_document(html);

        let mut entries: Vec<IndexEntry> = Vec::new();
        for link in document.select(link_selector()) {
            let name = element_text(&link);
            if name.is_empty() {
                continue;
            }
            let Some(url) = link.value().attr("href").and_then(|href| resolve_url(base_url, href))
            else {
                continue;
            };
            if entries.iter().any(|e| e.url == url) {
                continue;
            }
            entries.push(IndexEntry { name, url });
        }

        entries
    }
}
