use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use newsroom_core::{Config, SitemapEntry};
use newsroom_generator::{GENERAL_PRIORITY, dedup_entries, render_sitemap};
use newsroom_scanner::{ScanOptions, discover_pages};
use std::fs;
use std::path::Path;
use tracing::info;

/// Outcome of one static-sitemap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapReport {
    pub urls: usize,
}

/// Scan the site root and write the general sitemap
pub fn run(config: &Config, root: &Path) -> Result<SitemapReport> {
    println!("🗺️  Generating sitemap...");
    println!("   Root: {}", root.display());
    println!();

    let report = generate_sitemap(config, root, Utc::now().date_naive())?;

    println!(
        "✅ {} generated with {} URLs",
        config.sitemap.output_path.display(),
        report.urls
    );
    Ok(report)
}

/// Homepage first, then every discovered page, each dated `today`
pub fn generate_sitemap(config: &Config, root: &Path, today: NaiveDate) -> Result<SitemapReport> {
    if !root.is_dir() {
        anyhow::bail!("Site root does not exist: {}", root.display());
    }

    let base_url = &config.site.base_url;
    let pages = discover_pages(
        root,
        &ScanOptions {
            include_dirs: &config.sitemap.include_dirs,
            exclude: &config.sitemap.exclude,
        },
    );

    let mut entries = Vec::with_capacity(pages.len() + 1);
    entries.push(SitemapEntry::new(format!("{}/", base_url), today));
    entries.extend(
        pages
            .iter()
            .map(|page| SitemapEntry::new(format!("{}{}", base_url, page), today)),
    );
    let entries = dedup_entries(entries);

    let output_path = root.join(&config.sitemap.output_path);
    fs::write(&output_path, render_sitemap(&entries, GENERAL_PRIORITY))
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!(urls = entries.len(), path = %output_path.display(), "Sitemap written");

    Ok(SitemapReport {
        urls: entries.len(),
    })
}
