// file: src/source/mod.rs
// description: paper source abstraction and arXiv implementation
// reference: internal module structure

mod arxiv;
mod feed;

pub use arxiv::{ArxivClient, window_start, within_window};
pub use feed::{paper_id_from_url, parse_atom_feed};

use crate::error::Result;
use crate::models::Paper;
use async_trait::async_trait;

/// Search backend queried once per topic.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Up to `max_results` most recent matches published within the last
    /// `days_back` days. Failures are reported as `SourceUnavailable`.
    async fn search(&self, topic: &str, max_results: usize, days_back: u32) -> Result<Vec<Paper>>;
}
