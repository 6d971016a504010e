// file: src/pipeline/report.rs
// description: console report of relevant papers grouped by publication date

use crate::models::Paper;
use crate::notify::format_entry;
use chrono::{DateTime, Utc};

pub fn render_console_report(
    papers: &[Paper],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    model: &str,
    days_back: u32,
) -> String {
    let mut out = format!(
        "\n=== arXiv Report ({} → {}) Filtered by {} ===\n",
        window_start.date_naive(),
        window_end.date_naive(),
        model
    );

    if papers.is_empty() {
        out.push_str(&format!(
            "\nNo relevant papers found for the last {} days.\n",
            days_back
        ));
        return out;
    }

    let mut sorted: Vec<&Paper> = papers.iter().collect();
    sorted.sort_by(|a, b| b.published_date().cmp(&a.published_date()));

    let mut current_date = None;
    for paper in sorted {
        let date = paper.published_date();
        if current_date != Some(date) {
            current_date = Some(date);
            out.push_str(&format!("\n##### {} #####\n\n", date));
        }
        out.push_str(&format_entry(paper));
    }

    out
}
