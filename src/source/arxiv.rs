// file: src/source/arxiv.rs
// description: arXiv export API client with client-side recency filtering
// reference: https://info.arxiv.org/help/api/user-manual.html

use super::PaperSource;
use super::feed::parse_atom_feed;
use crate::config::SourceConfig;
use crate::error::{PipelineError, Result};
use crate::models::Paper;
use crate::utils::OperationTimer;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

const USER_AGENT: &str = concat!("arxiv_watch/", env!("CARGO_PKG_VERSION"));

pub struct ArxivClient {
    client: Client,
    endpoint: String,
}

impl ArxivClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn fetch_feed(&self, topic: &str, max_results: usize) -> Result<String> {
        let search_query = format!("all:{}", topic.trim());
        debug!(
            "Querying arXiv API for '{}' (max_results={})",
            topic, max_results
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("search_query", search_query.as_str())])
            .query(&[("start", 0), ("max_results", max_results)])
            .query(&[("sortBy", "submittedDate"), ("sortOrder", "descending")])
            .header(ACCEPT, "application/atom+xml, application/xml;q=0.9")
            .send()
            .await
            .map_err(|e| PipelineError::source_unavailable(topic, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::source_unavailable(
                topic,
                format!("HTTP {}: {}", status, body.trim()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| PipelineError::source_unavailable(topic, e.to_string()))
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn search(&self, topic: &str, max_results: usize, days_back: u32) -> Result<Vec<Paper>> {
        let timer = OperationTimer::new(&format!("arXiv search '{}'", topic));

        let body = self.fetch_feed(topic, max_results).await?;
        let papers = parse_atom_feed(&body)
            .map_err(|e| PipelineError::source_unavailable(topic, e.to_string()))?;
        let fetched = papers.len();

        let recent = within_window(papers, days_back, Utc::now());
        debug!(
            "Parsed {} entries for '{}', {} within the last {} days",
            fetched,
            topic,
            recent.len(),
            days_back
        );

        timer.finish_with_count(fetched);
        Ok(recent)
    }
}

/// Start of the recency window, clamped to the earliest representable instant.
pub fn window_start(now: DateTime<Utc>, days_back: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days_back))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Keeps papers published in `[now - days_back, now]`, preserving order.
pub fn within_window(papers: Vec<Paper>, days_back: u32, now: DateTime<Utc>) -> Vec<Paper> {
    let start = window_start(now, days_back);
    papers
        .into_iter()
        .filter(|paper| {
            let keep = paper.is_within(start, now);
            if !keep {
                debug!(
                    "Entry {} published {} is outside the window, skipping",
                    paper.id,
                    paper.published_date()
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::TimeZone;

    fn paper_at(id: &str, published: DateTime<Utc>) -> Paper {
        Paper::new(id, "title", "abstract", vec![], "https://arxiv.org", published)
    }

    #[test]
    fn test_within_window_filters_old_and_future() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let papers = vec![
            paper_at("fresh", now - Duration::days(1)),
            paper_at("edge", now - Duration::days(7)),
            paper_at("stale", now - Duration::days(8)),
            paper_at("future", now + Duration::hours(1)),
        ];

        let ids: Vec<String> = within_window(papers, 7, now)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["fresh".to_string(), "edge".to_string()]);
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        assert_eq!(window_start(now, 100_000_000), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now, 1), now - Duration::days(1));

        let old = paper_at("old", now - Duration::days(3650));
        let kept = within_window(vec![old], u32::MAX, now);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_client_construction() {
        let config = Config::default_config();
        let client = ArxivClient::new(&config.source).unwrap();
        assert_eq!(client.endpoint, "http://export.arxiv.org/api/query");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_source_unavailable() {
        let mut config = Config::default_config();
        config.source.endpoint = "http://127.0.0.1:9/api/query".to_string();
        config.source.timeout_secs = 2;
        let client = ArxivClient::new(&config.source).unwrap();

        let err = client.search("text to table", 5, 7).await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
        assert!(!err.is_fatal());
    }
}
