// file: src/relevance/filter.rs
// description: yes/no relevance check of a paper against a topic
// reference: inference failures count as not relevant

use super::{LanguageModel, Verdict};
use crate::models::Paper;
use crate::utils::{OperationTimer, Validator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const SLOW_INFERENCE: Duration = Duration::from_secs(30);
const LOGGED_OUTPUT_CHARS: usize = 500;

pub fn build_prompt(paper: &Paper, topic: &str) -> String {
    format!(
        "Is this paper substantially related to the following topic?\n\
         - {topic}\n\n\
         Title: {title}\n\
         Abstract: {abstract_text}\n\n\
         Respond with ONLY one word: YES or NO. Do not explain.",
        topic = topic.trim(),
        title = paper.title,
        abstract_text = paper.abstract_text,
    )
}

pub struct RelevanceFilter {
    model: Arc<dyn LanguageModel>,
}

impl RelevanceFilter {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Never fails: an unreachable model yields [`Verdict::Unknown`].
    pub async fn judge(&self, paper: &Paper, topic: &str) -> Verdict {
        let prompt = build_prompt(paper, topic);
        debug!(
            "Filtering paper '{}' ({} character abstract)",
            Validator::truncate_text(&paper.title, 60),
            paper.abstract_text.chars().count()
        );

        let timer = OperationTimer::new(&format!("relevance check {}", paper.id));
        let output = match self.model.complete(&prompt).await {
            Ok(output) => output,
            Err(e) => {
                warn!(
                    "Relevance check failed for {}, treating as not relevant: {}",
                    paper.id, e
                );
                return Verdict::Unknown;
            }
        };
        timer.warn_if_slow(SLOW_INFERENCE, self.model.model_name());
        timer.finish();

        if output.is_empty() {
            debug!("Raw model output: (empty)");
        } else {
            debug!(
                "Raw model output: {}",
                Validator::truncate_text(&output, LOGGED_OUTPUT_CHARS)
            );
        }

        let verdict = Verdict::parse(&output);
        if verdict == Verdict::Unknown {
            warn!(
                "Unexpected model answer for {}: '{}', treating as not relevant",
                paper.id,
                Validator::truncate_text(&output, 40)
            );
        }
        verdict
    }

    pub async fn is_relevant(&self, paper: &Paper, topic: &str) -> bool {
        self.judge(paper, topic).await.is_relevant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, Result};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn answering(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(PipelineError::Inference("connection refused".to_string())),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(PipelineError::Inference(e.to_string())),
            }
        }
    }

    fn paper() -> Paper {
        Paper::new(
            "2501.00001",
            "Qubit routing on sparse hardware",
            "We route qubits.",
            vec!["Grace Hopper".to_string()],
            "https://arxiv.org/abs/2501.00001",
            Utc::now(),
        )
    }

    #[test]
    fn test_prompt_contains_topic_and_paper() {
        let prompt = build_prompt(&paper(), "  quantum computing ");
        assert!(prompt.contains("- quantum computing\n"));
        assert!(prompt.contains("Title: Qubit routing on sparse hardware"));
        assert!(prompt.contains("Abstract: We route qubits."));
        assert!(prompt.ends_with("Respond with ONLY one word: YES or NO. Do not explain."));
    }

    #[tokio::test]
    async fn test_yes_is_relevant() {
        let model = ScriptedModel::answering("YES");
        let filter = RelevanceFilter::new(model.clone());
        assert!(filter.is_relevant(&paper(), "quantum computing").await);
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_answer_is_not_relevant() {
        let filter = RelevanceFilter::new(ScriptedModel::answering("It depends."));
        assert_eq!(filter.judge(&paper(), "quantum computing").await, Verdict::Unknown);
        assert!(!filter.is_relevant(&paper(), "quantum computing").await);
    }

    #[tokio::test]
    async fn test_inference_failure_is_not_relevant() {
        let filter = RelevanceFilter::new(ScriptedModel::failing());
        assert!(!filter.is_relevant(&paper(), "quantum computing").await);
    }
}
