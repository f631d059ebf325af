pub mod news;
pub mod sitemap;

use anyhow::{Context, Result};
use clap::Args;
use newsroom_core::Config;
use std::path::PathBuf;

/// Where the site lives and how it is configured
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Config file (defaults to ./newsroom.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Site root that output paths are relative to
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,
}

/// Overrides for the article API
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Maximum number of article pages to generate
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Article API base URL
    #[arg(long)]
    pub api_base: Option<String>,
}

/// Load the config file and apply command-line overrides
pub fn load_config(site: &SiteArgs, fetch: Option<&FetchArgs>) -> Result<Config> {
    let mut config =
        Config::load(site.config.as_deref()).context("Failed to load configuration")?;

    if let Some(fetch) = fetch {
        if let Some(limit) = fetch.limit {
            config.news.max_articles = limit;
        }
        if let Some(api_base) = &fetch.api_base {
            config.api.base_url = api_base.clone();
        }
    }

    config.validate().context("Invalid configuration")
}
