use std::{collections::HashMap, path::Path};

use anyhow::{bail, Context};
use tracing::debug;

use crate::{GithubHandle, ScoreMap};

/// Display names for raw logins. Lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    names: HashMap<String, String>,
}

impl UserInfo {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(login, name)| (login.as_ref().to_lowercase(), name.into()))
                .collect(),
        }
    }

    /// Reads a JSON object (`{"login": "Name"}`) or a two-column CSV with a header row.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read user info file {}", path.display()))?;

        let info = match extension.as_deref() {
            Some("json") => Self::from_json(&content),
            Some("csv") => Self::from_csv(&content),
            _ => bail!(
                "Unsupported user info file {}, expected .json or .csv",
                path.display()
            ),
        };
        let info = info.with_context(|| format!("Malformed user info file {}", path.display()))?;
        debug!("Loaded {} display names from {}", info.len(), path.display());
        Ok(info)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let names: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self::new(names))
    }

    pub fn from_csv(content: &str) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut entries = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != 2 {
                // Header is line 1.
                bail!("Line {} has {} columns, expected 2", line + 2, record.len());
            }
            entries.push((record[0].to_string(), record[1].to_string()));
        }
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn display_name<'a>(&'a self, login: &'a str) -> &'a str {
        self.names
            .get(&login.to_lowercase())
            .map(String::as_str)
            .unwrap_or(login)
    }

    /// Re-keys scores by display name. Logins sharing a display name are
    /// combined by summing, as in cross-repository aggregation.
    pub fn remap(&self, scores: ScoreMap) -> ScoreMap {
        let mut result = ScoreMap::new();
        for (login, score) in scores {
            let name: GithubHandle = self.display_name(&login).to_string();
            result
                .entry(name)
                .and_modify(|acc| {
                    debug!("Combining {login} with another login of the same display name");
                    *acc = *acc + score
                })
                .or_insert(score);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ActivityRecord, ScoreAnalyzer};

    fn scores(entries: &[(&str, u32)]) -> ScoreMap {
        let analyzer = ScoreAnalyzer::default();
        entries
            .iter()
            .map(|(login, prs)| {
                (
                    login.to_string(),
                    analyzer.score(&ActivityRecord::new(*prs, 0, 0, 0, 0)),
                )
            })
            .collect()
    }

    #[test]
    fn remaps_ignoring_case_and_keeps_unknown() {
        let info = UserInfo::new([("Alice", "Alice Liddell")]);
        let remapped = info.remap(scores(&[("alice", 1), ("bob", 2)]));
        assert_eq!(
            remapped.keys().cloned().collect::<Vec<_>>(),
            vec!["Alice Liddell".to_string(), "bob".to_string()]
        );
    }

    #[test]
    fn logins_with_same_name_are_combined() {
        let info = UserInfo::new([("alice", "Alice"), ("alice-work", "Alice")]);
        let remapped = info.remap(scores(&[("alice", 1), ("alice-work", 2)]));
        assert_eq!(remapped.len(), 1);
        assert_eq!(remapped["Alice"].total(), 9);
        assert_eq!(remapped["Alice"].activity().pr_feature_fix, 3);
    }

    #[test]
    fn loads_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("users.json");
        std::fs::write(&json, r#"{"alice": "Alice", "BOB": "Bob"}"#).unwrap();
        let info = UserInfo::load_from_file(&json).unwrap();
        assert_eq!(info.len(), 2);
        assert_eq!(info.display_name("bob"), "Bob");

        let csv = dir.path().join("users.csv");
        std::fs::write(&csv, "login,name\nalice, Alice \ncarol,Carol\n").unwrap();
        let info = UserInfo::load_from_file(&csv).unwrap();
        assert_eq!(info.display_name("ALICE"), "Alice");
        assert_eq!(info.display_name("carol"), "Carol");
        assert_eq!(info.display_name("dave"), "dave");
    }

    #[test]
    fn malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("users.json");
        std::fs::write(&json, "[1, 2, 3]").unwrap();
        assert!(UserInfo::load_from_file(&json).is_err());

        let csv = dir.path().join("users.csv");
        std::fs::write(&csv, "login,name,extra\nalice,Alice,1\n").unwrap();
        assert!(UserInfo::load_from_file(&csv).is_err());

        let txt = dir.path().join("users.txt");
        std::fs::write(&txt, "alice=Alice").unwrap();
        assert!(UserInfo::load_from_file(&txt).is_err());

        assert!(UserInfo::load_from_file(&dir.path().join("missing.json")).is_err());
    }
}
