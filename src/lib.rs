// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod relevance;
pub mod source;
pub mod utils;

pub use cache::{SeenSet, SeenStore};
pub use config::{
    CacheConfig, Config, EmailConfig, LlmConfig, SearchConfig, SmtpSettings, SourceConfig,
};
pub use error::{PipelineError, Result};
pub use models::Paper;
pub use notify::{MailTransport, Notifier, NotifyOutcome, OutgoingEmail, SmtpMailer};
pub use pipeline::{
    PipelineOrchestrator, PipelineStats, ProgressTracker, RunReport, render_console_report,
};
pub use relevance::{LanguageModel, OllamaClient, RelevanceFilter, Verdict};
pub use source::{ArxivClient, PaperSource};
pub use utils::{OperationTimer, Validator};
