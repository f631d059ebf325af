// Article page and sitemap generation

pub mod content;
pub mod page;
pub mod sitemap;
pub mod template;

pub use page::PageComposer;
pub use sitemap::{GENERAL_PRIORITY, NEWS_PRIORITY, dedup_entries, render_sitemap};
