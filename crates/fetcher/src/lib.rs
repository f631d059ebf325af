// Article sources (HTTP API, future: feeds, local dumps)

pub mod api;

pub use api::ApiClient;

use async_trait::async_trait;
use newsroom_core::ArticleRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout or unreadable body
    #[error("Failed to fetch articles: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch articles: HTTP {status} {body}")]
    Status { status: u16, body: String },

    #[error("Malformed article response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Something that can hand out the newest articles
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Up to `limit` records, newest first. Invalid records are not filtered.
    async fn fetch_latest(&self, limit: usize) -> Result<Vec<ArticleRecord>>;
}

/// Order newest-first by [`ArticleRecord::freshness_key`].
///
/// Records without any timestamp go last. The sort is stable, so records
/// with equal keys keep their response order.
pub fn sort_by_freshness(records: &mut [ArticleRecord]) {
    records.sort_by(|a, b| b.freshness_key().cmp(a.freshness_key()));
}
