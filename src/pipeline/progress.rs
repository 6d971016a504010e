// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub topics_processed: usize,
    pub topics_failed: usize,
    pub papers_in_window: usize,
    pub already_seen: usize,
    pub model_calls: usize,
    pub relevant_found: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relevance_rate(&self) -> f64 {
        if self.model_calls == 0 {
            return 0.0;
        }
        (self.relevant_found as f64 / self.model_calls as f64) * 100.0
    }

    pub fn log_summary(&self) {
        info!("=== Run Summary ===");
        info!("Duration: {} seconds", self.duration_secs);
        info!(
            "Topics processed: {} ({} failed)",
            self.topics_processed, self.topics_failed
        );
        info!("Entries in date range: {}", self.papers_in_window);
        info!("Already seen: {}", self.already_seen);
        info!("Model calls: {}", self.model_calls);
        info!(
            "Relevant papers found: {} ({:.1}% of checked)",
            self.relevant_found,
            self.relevance_rate()
        );
        info!("===================");
    }
}

/// Topic-level progress bar plus the counters behind [`PipelineStats`].
pub struct ProgressTracker {
    bar: ProgressBar,
    stats: PipelineStats,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_topics: usize, visible: bool) -> Self {
        let bar = if visible && std::io::stderr().is_terminal() {
            create_progress_bar(total_topics as u64)
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            stats: PipelineStats::new(),
            start_time: Instant::now(),
        }
    }

    pub fn start_topic(&self, topic: &str) {
        self.bar.set_message(topic.to_string());
    }

    pub fn topic_done(&mut self) {
        self.stats.topics_processed += 1;
        self.bar.inc(1);
    }

    pub fn topic_failed(&mut self) {
        self.stats.topics_processed += 1;
        self.stats.topics_failed += 1;
        self.bar.inc(1);
    }

    pub fn add_in_window(&mut self, count: usize) {
        self.stats.papers_in_window += count;
    }

    pub fn inc_already_seen(&mut self) {
        self.stats.already_seen += 1;
    }

    pub fn inc_model_calls(&mut self) {
        self.stats.model_calls += 1;
    }

    pub fn inc_relevant(&mut self) {
        self.stats.relevant_found += 1;
    }

    pub fn finish(self) -> PipelineStats {
        self.bar.finish_and_clear();
        let mut stats = self.stats;
        stats.duration_secs = self.start_time.elapsed().as_secs();
        stats
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        Ok(style) => bar.set_style(style.progress_chars("█▓▒░")),
        Err(_) => bar.set_style(ProgressStyle::default_bar()),
    }
    bar
}
