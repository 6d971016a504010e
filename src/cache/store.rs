// file: src/cache/store.rs
// description: flat-file persistence for previously notified paper identifiers
// reference: one identifier per line, rewritten in full on save

use crate::error::{PipelineError, Result};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Identifiers already evaluated as relevant. Grows only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: BTreeSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the identifier was not present before.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn parse(contents: &str) -> Self {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for id in &self.ids {
            out.push_str(id);
            out.push('\n');
        }
        out
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty set. Any other read failure is fatal.
    pub async fn load(&self) -> Result<SeenSet> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No seen cache at {}, starting empty", self.path.display());
                return Ok(SeenSet::new());
            }
            Err(source) => {
                return Err(PipelineError::CacheLoad {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let seen = SeenSet::parse(&contents);
        info!(
            "Loaded {} seen paper ids from {}",
            seen.len(),
            self.path.display()
        );
        Ok(seen)
    }

    /// Overwrites the file with the full set, creating parent directories as needed.
    pub async fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.persist_error(source))?;
        }

        fs::write(&self.path, seen.render())
            .await
            .map_err(|source| self.persist_error(source))?;

        debug!(
            "Saved {} seen paper ids to {}",
            seen.len(),
            self.path.display()
        );
        Ok(())
    }

    fn persist_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::CachePersist {
            path: self.path.clone(),
            source,
        }
    }
}
