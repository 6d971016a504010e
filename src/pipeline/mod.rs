// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod progress;
mod report;

pub use orchestrator::{PipelineOrchestrator, RunReport};
pub use progress::{PipelineStats, ProgressTracker};
pub use report::render_console_report;
