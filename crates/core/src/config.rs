use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "newsroom.toml";

/// Raw TOML configuration structure.
/// Every section and field is optional; missing values take the defaults below.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    site: RawSite,
    #[serde(default)]
    api: RawApi,
    #[serde(default)]
    news: RawNews,
    #[serde(default)]
    sitemap: RawSitemap,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    base_url: Option<String>,
    name: Option<String>,
    default_image: Option<String>,
    logo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApi {
    base_url: Option<String>,
    request_limit: Option<usize>,
    connect_timeout_secs: Option<u64>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNews {
    output_dir: Option<String>,
    max_articles: Option<usize>,
    sitemap_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSitemap {
    include_dirs: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    output_path: Option<String>,
}

/// Complete, validated pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub site: SiteConfig,
    pub api: ApiConfig,
    pub news: NewsConfig,
    pub sitemap: SitemapConfig,
}

/// Public identity of the site the pages are published on
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Origin without trailing slash, e.g. `https://example.com`
    pub base_url: String,
    /// Organization name used in titles and structured data
    pub name: String,
    /// Social preview image used when an article has no hero
    pub default_image: String,
    pub logo: String,
}

impl SiteConfig {
    /// Resolve a site-relative path (or pass through an absolute URL)
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Article API endpoint and request bounds
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// `limit` sent to the API; upper bound on records received
    pub request_limit: usize,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

/// Where and how many article pages are generated
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Directory (relative to the output root) that doubles as the URL prefix
    pub output_dir: String,
    /// Pages kept after sorting; never above `api.request_limit`
    pub max_articles: usize,
    pub sitemap_path: PathBuf,
}

/// Static sitemap discovery settings
#[derive(Debug, Clone)]
pub struct SitemapConfig {
    pub include_dirs: Vec<PathBuf>,
    /// File and directory names skipped during discovery
    pub exclude: Vec<String>,
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        // The built-in defaults always validate
        from_raw(RawConfig::default()).unwrap_or_else(|e| unreachable!("invalid defaults: {e}"))
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read from the working directory if present, otherwise built-in
    /// defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => parse_config(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    parse_config(default_path)
                } else {
                    info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Re-check invariants after command-line overrides were applied
    pub fn validate(mut self) -> Result<Self> {
        self.site.base_url = normalize_base_url(&self.site.base_url, "site.base_url")?;
        self.api.base_url = normalize_base_url(&self.api.base_url, "api.base_url")?;

        if self.api.request_limit == 0 {
            return Err(Error::ConfigParse(
                "api.request_limit must be greater than 0".to_string(),
            ));
        }
        if self.news.max_articles == 0 {
            return Err(Error::ConfigParse(
                "news.max_articles must be greater than 0".to_string(),
            ));
        }
        if self.news.max_articles > self.api.request_limit {
            return Err(Error::ConfigParse(format!(
                "news.max_articles ({}) cannot exceed api.request_limit ({})",
                self.news.max_articles, self.api.request_limit
            )));
        }
        if self.api.connect_timeout.is_zero() || self.api.timeout.is_zero() {
            return Err(Error::ConfigParse(
                "API timeouts must be at least one second".to_string(),
            ));
        }

        validate_path(&self.news.output_dir, "news.output_dir")?;
        validate_path(&self.news.sitemap_path.to_string_lossy(), "news.sitemap_path")?;
        validate_path(&self.sitemap.output_path.to_string_lossy(), "sitemap.output_path")?;
        for dir in &self.sitemap.include_dirs {
            validate_path(&dir.to_string_lossy(), "sitemap.include_dirs")?;
        }
        self.news.output_dir = self.news.output_dir.trim_matches('/').replace('\\', "/");

        Ok(self)
    }
}

/// Parse a config file from a path
pub fn parse_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::ConfigParse(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = parse_config_str(&content)?;
    info!(config_path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Parse a config file from a string (useful for testing)
pub fn parse_config_str(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;
    let config = from_raw(raw)?;
    debug!(?config, "Configuration parsed");
    Ok(config)
}

fn from_raw(raw: RawConfig) -> Result<Config> {
    let site = SiteConfig {
        base_url: raw
            .site
            .base_url
            .unwrap_or_else(|| "https://viralnewsalert.com".to_string()),
        name: raw.site.name.unwrap_or_else(|| "Viral News".to_string()),
        default_image: raw
            .site
            .default_image
            .unwrap_or_else(|| "/android-chrome-512x512.png".to_string()),
        logo: raw.site.logo.unwrap_or_else(|| "/favicon-32x32.png".to_string()),
    };

    let api = ApiConfig {
        base_url: raw
            .api
            .base_url
            .unwrap_or_else(|| "https://viral-news-backend-3.onrender.com".to_string()),
        request_limit: raw.api.request_limit.unwrap_or(500),
        connect_timeout: Duration::from_secs(raw.api.connect_timeout_secs.unwrap_or(10)),
        timeout: Duration::from_secs(raw.api.timeout_secs.unwrap_or(30)),
    };

    let news = NewsConfig {
        output_dir: raw.news.output_dir.unwrap_or_else(|| "news".to_string()),
        max_articles: raw.news.max_articles.unwrap_or(300),
        sitemap_path: PathBuf::from(
            raw.news
                .sitemap_path
                .unwrap_or_else(|| "news-sitemap.xml".to_string()),
        ),
    };

    let sitemap = SitemapConfig {
        include_dirs: raw
            .sitemap
            .include_dirs
            .unwrap_or_else(|| vec![".".to_string(), "category".to_string()])
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        exclude: raw
            .sitemap
            .exclude
            .unwrap_or_else(|| vec![".venv".to_string(), "CNAME".to_string()]),
        output_path: PathBuf::from(
            raw.sitemap
                .output_path
                .unwrap_or_else(|| "sitemap.xml".to_string()),
        ),
    };

    Config {
        site,
        api,
        news,
        sitemap,
    }
    .validate()
}

fn normalize_base_url(url: &str, field_name: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::ConfigParse(format!(
            "'{}' must be an http(s) URL, got '{}'",
            field_name, url
        )));
    }
    if trimmed.split("://").nth(1).is_none_or(str::is_empty) {
        return Err(Error::ConfigParse(format!(
            "'{}' is missing a host: '{}'",
            field_name, url
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a path string from the config file.
///
/// Output and discovery paths are always resolved against the output root,
/// so absolute paths and parent directory references (`..`) are rejected.
///
/// ```text
/// validate_path("news", "news.output_dir")          → Ok(())
/// validate_path("/var/www", "news.output_dir")      → Err("Absolute paths not allowed...")
/// validate_path("../elsewhere", "sitemap.include_dirs") → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<()> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() || path_str.starts_with('/') || path_str.starts_with('\\') {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(())
}
