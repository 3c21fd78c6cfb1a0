use std::path::PathBuf;

use anyhow::Context;
use shared::{ActivityMap, RepoId};

/// Collected activity stored as one JSON file per repository. Entries never expire.
#[derive(Debug, Clone)]
pub struct ActivityCache {
    dir: PathBuf,
}

impl ActivityCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, repo: &RepoId) -> PathBuf {
        self.dir.join(format!("{}.json", repo.label()))
    }

    /// `Ok(None)` when nothing was cached for the repository yet.
    pub fn load(&self, repo: &RepoId) -> anyhow::Result<Option<ActivityMap>> {
        let path = self.path(repo);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file {}", path.display()))?;
        let activity = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache file {}", path.display()))?;
        Ok(Some(activity))
    }

    pub fn store(&self, repo: &RepoId, activity: &ActivityMap) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory {}", self.dir.display()))?;
        let path = self.path(repo);
        let content = serde_json::to_string_pretty(activity)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write cache file {}", path.display()))?;
        Ok(())
    }
}
