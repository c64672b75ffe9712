//! Web scraper module for betmma.tips
//!
//! Provides page fetching, request pacing, and HTML parsing.

pub mod parsers;
pub mod rate_limiter;
pub mod transport;

pub use rate_limiter::RateLimiter;
pub use transport::{HttpTransport, Transport};

use url::Url;

/// Build the listings index URL
pub fn index_url(base_url: &str, index_path: &str) -> Option<String> {
    resolve_url(base_url, index_path)
}

/// Resolve a link found on a page against the site base
pub fn resolve_url(base_url: &str, href: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    base.join(href.trim()).ok().map(String::from)
}
