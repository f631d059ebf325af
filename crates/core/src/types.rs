use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Category used when a record carries none.
pub const DEFAULT_CATEGORY: &str = "general";

/// Opaque article identifier.
///
/// The API sends either a number or a string; both are kept as text since
/// the id only ever ends up in file names and URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            // Zero counts as a missing id, like any other falsy value
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Whether the id can be used as part of a single file name.
    ///
    /// Ids end up in `news/{category}/{title}-{id}.html`, so separators and
    /// parent references would move the page out of its category directory.
    pub fn is_file_safe(&self) -> bool {
        let id = self.0.as_str();
        !id.is_empty()
            && id != "."
            && !id.contains("..")
            && !id.contains(['/', '\\', '\0'])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One article as returned by the article API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleRecord {
    pub id: Option<ArticleId>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
}

impl ArticleRecord {
    /// Build a record from one element of the API response.
    ///
    /// Conversion is per field and never fails: a missing or wrongly typed
    /// field becomes `None`, and a non-object element becomes an empty
    /// record that [`ArticleRecord::is_renderable`] rejects.
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            id: value.get("id").and_then(ArticleId::from_json),
            title: text("title"),
            category: text("category"),
            content: text("content"),
            summary: text("summary"),
            image_url: text("image_url"),
            published_at: text("published_at"),
            created_at: text("created_at"),
        }
    }

    /// Whether the record has everything needed to render a page.
    ///
    /// An id that cannot sit inside a file name is treated as missing.
    pub fn is_renderable(&self) -> bool {
        self.id.as_ref().is_some_and(ArticleId::is_file_safe)
            && non_empty(&self.title).is_some()
            && non_empty(&self.content).is_some()
    }

    /// Title with surrounding whitespace removed
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default().trim()
    }

    /// Category name, defaulting to [`DEFAULT_CATEGORY`] when absent or empty
    pub fn category_name(&self) -> &str {
        non_empty(&self.category).unwrap_or(DEFAULT_CATEGORY).trim()
    }

    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    pub fn image_url_text(&self) -> &str {
        self.image_url.as_deref().unwrap_or_default().trim()
    }

    /// Timestamp used to order articles newest-first.
    ///
    /// Publish time wins over creation time; an article with neither yields
    /// the empty string and sorts after everything else.
    pub fn freshness_key(&self) -> &str {
        non_empty(&self.published_at)
            .or_else(|| non_empty(&self.created_at))
            .unwrap_or_default()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Everything needed to publish one article page
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    /// Path relative to the output root, e.g. `news/world/some-title-42.html`
    pub output_path: PathBuf,
    pub url: String,
    pub lastmod: NaiveDate,
    /// Empty when the article has no image of its own
    pub hero: String,
    pub html: String,
}

impl PageDescriptor {
    pub fn sitemap_entry(&self) -> SitemapEntry {
        SitemapEntry::new(self.url.clone(), self.lastmod)
    }
}

/// A single `<url>` in a sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
}

impl SitemapEntry {
    pub fn new(loc: impl Into<String>, lastmod: NaiveDate) -> Self {
        Self {
            loc: loc.into(),
            lastmod,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full_record() {
        let record = ArticleRecord::from_json(&json!({
            "id": 42,
            "title": "  Hello World  ",
            "category": "Tech",
            "content": "Body",
            "summary": "Short",
            "image_url": " https://img.example.com/a.jpg ",
            "published_at": "2024-06-01T10:00:00Z",
            "created_at": "2024-05-31T10:00:00Z"
        }));

        assert_eq!(record.id, Some(ArticleId::new("42")));
        assert_eq!(record.title_text(), "Hello World");
        assert_eq!(record.category_name(), "Tech");
        assert_eq!(record.image_url_text(), "https://img.example.com/a.jpg");
        assert_eq!(record.freshness_key(), "2024-06-01T10:00:00Z");
        assert!(record.is_renderable());
    }

    #[test]
    fn test_from_json_string_id() {
        let record = ArticleRecord::from_json(&json!({"id": "abc-1"}));
        assert_eq!(record.id.unwrap().as_str(), "abc-1");
    }

    #[test]
    fn test_from_json_tolerates_wrong_types() {
        let record = ArticleRecord::from_json(&json!({
            "id": true,
            "title": 7,
            "content": null,
            "summary": ["x"]
        }));
        assert_eq!(record, ArticleRecord::default());
        assert!(!record.is_renderable());
    }

    #[test]
    fn test_from_json_non_object() {
        assert_eq!(ArticleRecord::from_json(&json!("nope")), ArticleRecord::default());
        assert_eq!(ArticleRecord::from_json(&json!(null)), ArticleRecord::default());
    }

    #[test]
    fn test_is_renderable_requires_id_title_content() {
        let full = ArticleRecord {
            id: Some(ArticleId::new("1")),
            title: Some("T".into()),
            content: Some("C".into()),
            ..Default::default()
        };
        assert!(full.is_renderable());

        let no_id = ArticleRecord { id: None, ..full.clone() };
        assert!(!no_id.is_renderable());

        let empty_title = ArticleRecord { title: Some(String::new()), ..full.clone() };
        assert!(!empty_title.is_renderable());

        let empty_content = ArticleRecord { content: Some(String::new()), ..full.clone() };
        assert!(!empty_content.is_renderable());

        let zero_id = ArticleRecord {
            id: ArticleRecord::from_json(&json!({"id": 0})).id,
            ..full.clone()
        };
        assert!(!zero_id.is_renderable());
    }

    #[test]
    fn test_from_json_zero_id_is_missing() {
        assert_eq!(ArticleRecord::from_json(&json!({"id": 0})).id, None);
        assert_eq!(ArticleRecord::from_json(&json!({"id": 0.0})).id, None);
        assert_eq!(
            ArticleRecord::from_json(&json!({"id": "0"})).id,
            Some(ArticleId::new("0"))
        );
        assert_eq!(
            ArticleRecord::from_json(&json!({"id": 10})).id,
            Some(ArticleId::new("10"))
        );
    }

    #[test]
    fn test_id_must_fit_in_a_file_name() {
        assert!(ArticleId::new("42").is_file_safe());
        assert!(ArticleId::new("abc-1.v2").is_file_safe());

        assert!(!ArticleId::new("x/../../escaped").is_file_safe());
        assert!(!ArticleId::new("a/b").is_file_safe());
        assert!(!ArticleId::new("a\\b").is_file_safe());
        assert!(!ArticleId::new("..").is_file_safe());
        assert!(!ArticleId::new(".").is_file_safe());

        let record = ArticleRecord {
            id: Some(ArticleId::new("../escaped")),
            title: Some("T".into()),
            content: Some("C".into()),
            ..Default::default()
        };
        assert!(!record.is_renderable());
    }

    #[test]
    fn test_category_defaults() {
        let mut record = ArticleRecord::default();
        assert_eq!(record.category_name(), DEFAULT_CATEGORY);

        record.category = Some(String::new());
        assert_eq!(record.category_name(), DEFAULT_CATEGORY);

        record.category = Some("  Sports ".into());
        assert_eq!(record.category_name(), "Sports");
    }

    #[test]
    fn test_freshness_key_fallbacks() {
        let mut record = ArticleRecord {
            created_at: Some("2024-01-01".into()),
            ..Default::default()
        };
        assert_eq!(record.freshness_key(), "2024-01-01");

        record.published_at = Some(String::new());
        assert_eq!(record.freshness_key(), "2024-01-01");

        record.published_at = Some("2024-02-01".into());
        assert_eq!(record.freshness_key(), "2024-02-01");

        assert_eq!(ArticleRecord::default().freshness_key(), "");
    }
}
