// file: src/source/feed.rs
// description: arXiv Atom feed parsing into paper records
// reference: https://info.arxiv.org/help/api/user-manual.html

use crate::error::{PipelineError, Result};
use crate::models::Paper;
use crate::utils::Validator;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

#[derive(Default)]
struct EntryState {
    id_url: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    alternate: Option<String>,
    in_author: bool,
    text: String,
}

impl EntryState {
    fn capture_link(&mut self, element: &BytesStart<'_>) {
        let mut rel = None;
        let mut href = None;
        for attr in element.attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(|v| v.to_string())
                .unwrap_or_default();
            match attr.key.as_ref() {
                b"rel" => rel = Some(value),
                b"href" => href = Some(value),
                _ => {}
            }
        }
        if rel.as_deref() == Some("alternate") && self.alternate.is_none() {
            self.alternate = href;
        }
    }

    fn into_paper(self) -> Result<Option<Paper>> {
        if self.id_url.contains("/api/errors") {
            return Err(PipelineError::FeedParse(format!(
                "arXiv API error: {}",
                self.summary
            )));
        }

        let Some(id) = paper_id_from_url(&self.id_url) else {
            debug!("Skipping entry without an abs id: '{}'", self.id_url);
            return Ok(None);
        };

        let published = match DateTime::parse_from_rfc3339(&self.published) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                debug!(
                    "Skipping entry {} with unparseable published date '{}': {}",
                    id, self.published, e
                );
                return Ok(None);
            }
        };

        let link = self.alternate.unwrap_or_else(|| self.id_url.clone());

        Ok(Some(Paper::new(
            id,
            self.title,
            self.summary,
            self.authors,
            link,
            published,
        )))
    }
}

/// Extracts the arXiv identifier from an entry id URL, dropping the version
/// suffix so a revised paper keeps its identity.
pub fn paper_id_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let index = url.rfind("/abs/")?;
    let tail = url[index + "/abs/".len()..].trim_matches('/');
    if tail.is_empty() {
        return None;
    }
    Some(strip_version(tail).to_string())
}

fn strip_version(id: &str) -> &str {
    if let Some(pos) = id.rfind('v') {
        let (base, version) = id.split_at(pos);
        let digits = &version[1..];
        if !base.is_empty()
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && base.bytes().last().is_some_and(|b| b.is_ascii_digit())
        {
            return base;
        }
    }
    id
}

pub fn parse_atom_feed(body: &str) -> Result<Vec<Paper>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut papers = Vec::new();
    let mut entry: Option<EntryState> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" => entry = Some(EntryState::default()),
                b"author" => {
                    if let Some(cur) = entry.as_mut() {
                        cur.in_author = true;
                    }
                }
                b"link" => {
                    if let Some(cur) = entry.as_mut() {
                        cur.capture_link(&e);
                    }
                }
                _ => {
                    if let Some(cur) = entry.as_mut() {
                        cur.text.clear();
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"link"
                    && let Some(cur) = entry.as_mut()
                {
                    cur.capture_link(&e);
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(cur) = entry.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| PipelineError::FeedParse(e.to_string()))?;
                    cur.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if name == b"entry" {
                    if let Some(finished) = entry.take()
                        && let Some(paper) = finished.into_paper()?
                    {
                        papers.push(paper);
                    }
                } else if let Some(cur) = entry.as_mut() {
                    let text = Validator::normalize_whitespace(&cur.text);
                    match name {
                        b"id" => cur.id_url = text,
                        b"title" => cur.title = text,
                        b"summary" => cur.summary = text,
                        b"published" => cur.published = text,
                        b"name" if cur.in_author && !text.is_empty() => cur.authors.push(text),
                        b"author" => cur.in_author = false,
                        _ => {}
                    }
                    cur.text.clear();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PipelineError::FeedParse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title type="html">ArXiv Query: search_query=all:text+to+table</title>
  <id>http://arxiv.org/api/abc</id>
  <opensearch:totalResults>2</opensearch:totalResults>
  <entry>
    <id>http://arxiv.org/abs/2501.01234v2</id>
    <updated>2025-01-16T08:00:00Z</updated>
    <published>2025-01-15T12:00:00Z</published>
    <title>Text-to-Table
      Generation &amp; Beyond</title>
    <summary>  We study how to turn
      free text into tables.
    </summary>
    <author><name>Doe, J.</name></author>
    <author><name>Smith, A.</name><arxiv:affiliation xmlns:arxiv="http://arxiv.org/schemas/atom">MIT</arxiv:affiliation></author>
    <link href="http://arxiv.org/abs/2501.01234v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2501.01234v2" rel="related" type="application/pdf"/>
    <category term="cs.DB" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/cs/9901001v1</id>
    <published>not a date</published>
    <title>Old paper</title>
    <summary>Skipped.</summary>
  </entry>
</feed>
"#;

    #[test]
    fn test_parse_entries() {
        let papers = parse_atom_feed(SAMPLE).unwrap();
        assert_eq!(papers.len(), 1);

        let paper = &papers[0];
        assert_eq!(paper.id, "2501.01234");
        assert_eq!(paper.title, "Text-to-Table Generation & Beyond");
        assert_eq!(paper.abstract_text, "We study how to turn free text into tables.");
        assert_eq!(paper.authors, vec!["Doe, J.".to_string(), "Smith, A.".to_string()]);
        assert_eq!(paper.link, "http://arxiv.org/abs/2501.01234v2");
        assert_eq!(paper.published.to_rfc3339(), "2025-01-15T12:00:00+00:00");
    }

    #[test]
    fn test_feed_title_outside_entry_is_ignored() {
        let papers = parse_atom_feed(SAMPLE).unwrap();
        assert!(papers.iter().all(|p| !p.title.starts_with("ArXiv Query")));
    }

    #[test]
    fn test_empty_feed() {
        let body = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#;
        assert!(parse_atom_feed(body).unwrap().is_empty());
    }

    #[test]
    fn test_api_error_entry() {
        let body = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
  </entry>
</feed>"#;
        let err = parse_atom_feed(body).unwrap_err();
        assert!(err.to_string().contains("incorrect id format"));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(parse_atom_feed("<feed><entry><id>x</feed>").is_err());
    }

    #[test]
    fn test_paper_id_from_url() {
        assert_eq!(
            paper_id_from_url("http://arxiv.org/abs/2501.01234v3").as_deref(),
            Some("2501.01234")
        );
        assert_eq!(
            paper_id_from_url("http://arxiv.org/abs/cs/9901001v1").as_deref(),
            Some("cs/9901001")
        );
        assert_eq!(
            paper_id_from_url("https://arxiv.org/abs/2501.01234").as_deref(),
            Some("2501.01234")
        );
        assert_eq!(paper_id_from_url("http://arxiv.org/api/xyz"), None);
    }
}
