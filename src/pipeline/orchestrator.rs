// file: src/pipeline/orchestrator.rs
// description: coordinates fetching, deduplication, relevance filtering, and notification
// reference: sequential fetch -> dedupe -> filter -> persist -> notify per run

use crate::cache::SeenStore;
use crate::config::Config;
use crate::error::Result;
use crate::models::Paper;
use crate::notify::{Notifier, NotifyOutcome};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::relevance::{LanguageModel, OllamaClient, RelevanceFilter};
use crate::source::{ArxivClient, PaperSource, window_start};
use crate::utils::Validator;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Outcome of one invocation. `papers` is the run result: new relevant
/// papers in discovery order.
#[derive(Debug)]
pub struct RunReport {
    pub papers: Vec<Paper>,
    pub stats: PipelineStats,
    pub notification: NotifyOutcome,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

pub struct PipelineOrchestrator {
    config: Config,
    source: Arc<dyn PaperSource>,
    filter: RelevanceFilter,
    notifier: Notifier,
    store: SeenStore,
    show_progress: bool,
}

impl PipelineOrchestrator {
    pub fn new(
        config: Config,
        source: Arc<dyn PaperSource>,
        model: Arc<dyn LanguageModel>,
        notifier: Notifier,
    ) -> Self {
        let store = SeenStore::new(config.cache.path.clone());

        Self {
            config,
            source,
            filter: RelevanceFilter::new(model),
            notifier,
            store,
            show_progress: false,
        }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let source = Arc::new(ArxivClient::new(&config.source)?);
        let model = Arc::new(OllamaClient::new(&config.llm)?);
        let notifier = Notifier::from_config(&config);

        Ok(Self::new(config, source, model, notifier))
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Only a failure to load or persist the seen cache is returned as an error.
    pub async fn run(&self) -> Result<RunReport> {
        let search = &self.config.search;
        let window_end = Utc::now();
        let window_start = window_start(window_end, search.days_back);

        info!(
            "Starting run: {} topics, up to {} results each, last {} days, model {}",
            search.topics.len(),
            search.max_results,
            search.days_back,
            self.filter.model_name()
        );
        debug!(
            "Date range: {} to {}",
            window_start.date_naive(),
            window_end.date_naive()
        );

        let mut seen = self.store.load().await?;
        let mut progress = ProgressTracker::new(search.topics.len(), self.show_progress);
        let mut relevant: Vec<Paper> = Vec::new();

        for (idx, topic) in search.topics.iter().enumerate() {
            info!(
                "Processing topic {}/{}: '{}'",
                idx + 1,
                search.topics.len(),
                topic
            );
            progress.start_topic(topic);

            let papers = match self
                .source
                .search(topic, search.max_results, search.days_back)
                .await
            {
                Ok(papers) => papers,
                Err(e) => {
                    error!("Skipping topic '{}': {}", topic, e);
                    progress.topic_failed();
                    self.pause_between_topics(idx).await;
                    continue;
                }
            };

            progress.add_in_window(papers.len());
            let mut topic_relevant = 0;

            for paper in papers {
                if seen.contains(&paper.id) {
                    debug!("Already seen {}, skipping", paper.id);
                    progress.inc_already_seen();
                    continue;
                }

                progress.inc_model_calls();
                let verdict = self.filter.judge(&paper, topic).await;
                info!(
                    "{}: '{}'",
                    verdict,
                    Validator::truncate_text(&paper.title, 60)
                );

                if verdict.is_relevant() {
                    progress.inc_relevant();
                    topic_relevant += 1;
                    seen.insert(paper.id.clone());
                    relevant.push(paper);
                }
            }

            info!(
                "Topic '{}' summary: {} relevant papers found",
                topic, topic_relevant
            );
            progress.topic_done();
            self.pause_between_topics(idx).await;
        }

        self.store.save(&seen).await?;
        info!(
            "Seen cache now holds {} ids ({})",
            seen.len(),
            self.store.path().display()
        );

        let notification = self.notifier.notify(&relevant).await;

        let stats = progress.finish();
        stats.log_summary();

        Ok(RunReport {
            papers: relevant,
            stats,
            notification,
            window_start,
            window_end,
        })
    }

    async fn pause_between_topics(&self, idx: usize) {
        let delay = self.config.source.request_delay_secs;
        if delay == 0 || idx + 1 >= self.config.search.topics.len() {
            return;
        }
        debug!("Waiting {} seconds before next topic", delay);
        tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
    }
}
