use anyhow::{Context, Result};
use newsroom_core::{ArticleId, Config};
use newsroom_fetcher::{ApiClient, ArticleSource};
use newsroom_generator::{NEWS_PRIORITY, PageComposer, render_sitemap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of one page-generation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NewsReport {
    pub generated: usize,
    pub skipped: usize,
    pub sitemap_entries: usize,
}

/// Fetch articles from the configured API and publish their pages
pub async fn run(config: &Config, root: &Path) -> Result<NewsReport> {
    println!("📰 Generating article pages...");
    println!("   API:    {}", config.api.base_url);
    println!("   Output: {}", root.join(&config.news.output_dir).display());
    println!();

    let client = ApiClient::new(&config.api).context("Failed to create API client")?;
    let report = generate_news(config, root, &client).await?;

    println!(
        "✅ Generated {} pages into /{}/",
        report.generated, config.news.output_dir
    );
    if report.skipped > 0 {
        println!("   Skipped {} incomplete records", report.skipped);
    }
    println!(
        "✅ Wrote {} with {} URLs",
        config.news.sitemap_path.display(),
        report.sitemap_entries
    );

    Ok(report)
}

/// Compose every renderable record, write the pages, then the news sitemap.
///
/// The news sitemap is only written once every page is on disk. A failed
/// page write aborts the run and leaves the previous sitemap untouched.
pub async fn generate_news(
    config: &Config,
    root: &Path,
    source: &dyn ArticleSource,
) -> Result<NewsReport> {
    let records = source.fetch_latest(config.news.max_articles).await?;

    let composer = PageComposer::new(&config.site, &config.news.output_dir);
    let mut pages = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for record in &records {
        if !record.is_renderable() {
            skipped += 1;
            debug!(
                id = record.id.as_ref().map(ArticleId::as_str).unwrap_or("<none>"),
                "Skipping record without a usable id, title or content"
            );
            continue;
        }
        pages.push(composer.compose(record));
    }

    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create site root {}", root.display()))?;

    let mut entries = Vec::with_capacity(pages.len());
    for page in &pages {
        let path = root.join(&page.output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &page.html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Wrote article page");

        entries.push(page.sitemap_entry());
    }

    let sitemap_path = root.join(&config.news.sitemap_path);
    fs::write(&sitemap_path, render_sitemap(&entries, NEWS_PRIORITY))
        .with_context(|| format!("Failed to write {}", sitemap_path.display()))?;

    info!(
        generated = pages.len(),
        skipped,
        path = %sitemap_path.display(),
        "News sitemap written"
    );

    Ok(NewsReport {
        generated: pages.len(),
        skipped,
        sitemap_entries: entries.len(),
    })
}
