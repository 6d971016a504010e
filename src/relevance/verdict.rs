// file: src/relevance/verdict.rs
// description: mapping of free-text model answers to a yes/no/unknown verdict
// reference: unknown answers collapse to not relevant

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Yes,
    No,
    Unknown,
}

impl Verdict {
    pub fn parse(output: &str) -> Self {
        let answer = strip_reasoning(output);
        let words: Vec<String> = answer
            .split_whitespace()
            .map(normalize_word)
            .filter(|w| !w.is_empty())
            .collect();

        match words.first().map(String::as_str) {
            None => return Self::Unknown,
            Some("YES") => return Self::Yes,
            Some("NO") => return Self::No,
            Some(_) => {}
        }

        let has_yes = words.iter().any(|w| w == "YES");
        let has_no = words.iter().any(|w| w == "NO");
        match (has_yes, has_no) {
            (true, false) => Self::Yes,
            (false, true) => Self::No,
            _ => Self::Unknown,
        }
    }

    pub fn is_relevant(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Yes => "RELEVANT",
            Self::No => "NOT RELEVANT",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_uppercase()
}

/// Drops `<think>...</think>` blocks emitted by reasoning models. An
/// unterminated block leaves nothing to parse.
fn strip_reasoning(output: &str) -> String {
    let mut rest = output;
    let mut answer = String::new();
    while let Some(start) = rest.find("<think>") {
        answer.push_str(&rest[..start]);
        match rest[start..].find("</think>") {
            Some(end) => rest = &rest[start + end + "</think>".len()..],
            None => return answer,
        }
    }
    answer.push_str(rest);
    answer
}
