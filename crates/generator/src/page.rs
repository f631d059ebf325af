//! Article page composition.
//!
//! Maps an [`ArticleRecord`] to its canonical location and renders the
//! standalone HTML document for it.

use crate::content;
use crate::template::{self, ArticlePage};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use newsroom_core::config::SiteConfig;
use newsroom_core::{ArticleRecord, PageDescriptor, slugify};
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

/// Maximum description length, in characters
pub const DESCRIPTION_LIMIT: usize = 180;
/// Maximum structured-data headline length, in characters
pub const HEADLINE_LIMIT: usize = 110;

/// Builds article pages for one site
pub struct PageComposer<'a> {
    site: &'a SiteConfig,
    /// Output directory, also the URL prefix (e.g. `news`)
    section: &'a str,
}

impl<'a> PageComposer<'a> {
    pub fn new(site: &'a SiteConfig, section: &'a str) -> Self {
        Self { site, section }
    }

    /// Compose the page for a record that passed [`ArticleRecord::is_renderable`].
    ///
    /// Never fails: a missing or malformed timestamp degrades to the current
    /// time, and missing optional fields fall back to site defaults.
    pub fn compose(&self, record: &ArticleRecord) -> PageDescriptor {
        self.compose_at(record, Utc::now())
    }

    /// Same as [`PageComposer::compose`] with an explicit "now"
    pub fn compose_at(&self, record: &ArticleRecord, now: DateTime<Utc>) -> PageDescriptor {
        let id = record.id.as_ref().map(|id| id.as_str()).unwrap_or_default();
        let title = record.title_text();
        let category = record.category_name();

        let category_slug = slugify(category);
        let filename = format!("{}-{}.html", slugify(title), id);
        let output_path = PathBuf::from(self.section)
            .join(&category_slug)
            .join(&filename);
        let url = format!(
            "{}/{}/{}/{}",
            self.site.base_url, self.section, category_slug, filename
        );

        let published = parse_timestamp(record.freshness_key(), now);
        let published_iso = published.to_rfc3339_opts(SecondsFormat::AutoSi, false);
        let lastmod = published.date_naive();

        let (hero, remaining) = hero_and_content(record);
        let body_html = content::normalize(&remaining);

        let description = describe(record.summary_text(), &body_html);
        let og_image = if hero.is_empty() {
            self.site.asset_url(&self.site.default_image)
        } else {
            hero.clone()
        };

        let json_ld = json!({
            "@context": "https://schema.org",
            "@type": "NewsArticle",
            "mainEntityOfPage": {"@type": "WebPage", "@id": url},
            "headline": truncate_chars(title, HEADLINE_LIMIT),
            "datePublished": published_iso,
            "dateModified": published_iso,
            "author": {"@type": "Organization", "name": self.site.name},
            "publisher": {
                "@type": "Organization",
                "name": self.site.name,
                "logo": {"@type": "ImageObject", "url": self.site.asset_url(&self.site.logo)}
            },
            "image": [og_image]
        });

        let lastmod_text = lastmod.format("%Y-%m-%d").to_string();
        let html = template::render_article(&ArticlePage {
            site_name: &self.site.name,
            title,
            category,
            lastmod: &lastmod_text,
            description: &description,
            url: &url,
            og_image: &og_image,
            hero: &hero,
            body_html: &body_html,
            json_ld: &template::script_json(&json_ld),
        });

        PageDescriptor {
            output_path,
            url,
            lastmod,
            hero,
            html,
        }
    }
}

/// Pick the hero image and return the content with that image removed.
///
/// An inline `<img>` wins and is taken out of the body; otherwise the
/// record's own image URL is used.
fn hero_and_content(record: &ArticleRecord) -> (String, String) {
    let raw = record.content_text();
    let (mut hero, remaining) = if content::has_inline_image(raw) {
        (content::extract_hero(raw), content::strip_first_image(raw))
    } else {
        (String::new(), raw.to_string())
    };

    if hero.is_empty() {
        hero = record.image_url_text().to_string();
    }
    (hero, remaining)
}

fn describe(summary: &str, body_html: &str) -> String {
    let summary = summary.trim();
    let source = if summary.is_empty() {
        content::strip_tags(body_html)
    } else {
        summary.to_string()
    };
    truncate_chars(&content::collapse_whitespace(&source), DESCRIPTION_LIMIT)
}

/// Hard cut at `limit` characters, no word-boundary handling
pub fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Parse an API timestamp, falling back to `now` on anything unparseable.
///
/// Accepts RFC 3339 (`Z` or offset), naive date-times with `T` or a space
/// separator (treated as UTC), and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let raw = raw.trim();
    if raw.is_empty() {
        return now;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return dt.with_timezone(&Utc);
        }
    }

    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return dt.and_utc();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return dt.and_utc();
    }

    debug!(timestamp = raw, "Unparseable timestamp, using current time");
    now
}
