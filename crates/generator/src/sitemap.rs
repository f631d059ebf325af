//! Sitemap rendering.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>hourly</changefreq>
//!     <priority>0.8</priority>
//!   </url>
//! </urlset>
//! ```

use newsroom_core::SitemapEntry;
use std::borrow::Cow;
use std::collections::HashSet;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const CHANGE_FREQ: &str = "hourly";

/// Priority for pages discovered on disk
pub const GENERAL_PRIORITY: &str = "0.8";
/// Priority for generated article pages
pub const NEWS_PRIORITY: &str = "0.7";

/// Render entries in input order. No validation is done on the entries.
pub fn render_sitemap(entries: &[SitemapEntry], priority: &str) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 160);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in entries {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&entry.loc));
        xml.push_str("</loc>\n    <lastmod>");
        xml.push_str(&entry.lastmod.format("%Y-%m-%d").to_string());
        xml.push_str("</lastmod>\n    <changefreq>");
        xml.push_str(CHANGE_FREQ);
        xml.push_str("</changefreq>\n    <priority>");
        xml.push_str(priority);
        xml.push_str("</priority>\n  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Drop repeated URLs, keeping the first occurrence and the input order
pub fn dedup_entries(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.loc.clone()))
        .collect()
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
