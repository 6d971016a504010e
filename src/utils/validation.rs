// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_topics(topics: &[String]) -> Result<()> {
        if topics.is_empty() {
            return Err(PipelineError::Validation(
                "At least one topic must be configured".to_string(),
            ));
        }

        if let Some(position) = topics.iter().position(|t| t.trim().is_empty()) {
            return Err(PipelineError::Validation(format!(
                "Topic #{} is empty",
                position + 1
            )));
        }

        Ok(())
    }

    pub fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Truncates on a character boundary and appends `...` when shortened.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
            None => text.to_string(),
        }
    }
}
