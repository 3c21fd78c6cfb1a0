use std::path::PathBuf;

use shared::{rank, rates, ActivityRecord, GithubHandle, Rates, RepoId, ScoreMap};

pub const TOTAL_LABEL: &str = "total";

/// Where the artifacts of one score set go: `<dir>/<label>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTarget {
    pub label: String,
    pub dir: PathBuf,
}

impl ReportTarget {
    pub fn repo(dir: impl Into<PathBuf>, repo: &RepoId) -> Self {
        Self {
            label: repo.label(),
            dir: dir.into(),
        }
    }

    pub fn total(dir: impl Into<PathBuf>) -> Self {
        Self {
            label: TOTAL_LABEL.to_string(),
            dir: dir.into(),
        }
    }

    pub fn path(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", self.label))
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(format!("{}_state.csv", self.label))
    }
}

/// One line of every tabular report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub rank: usize,
    pub login: GithubHandle,
    pub activity: ActivityRecord,
    pub rates: Rates,
    pub total: u64,
}

/// Rows in rank order, highest total first.
pub fn report_rows(scores: &ScoreMap) -> Vec<ReportRow> {
    let rates = rates(scores);
    rank(scores)
        .into_iter()
        .map(|entry| ReportRow {
            rates: rates.get(&entry.login).copied().unwrap_or_default(),
            rank: entry.rank,
            activity: *entry.score.activity(),
            total: entry.score.total(),
            login: entry.login,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use shared::{ScoreAnalyzer, ScoringPolicy};

    use super::*;

    pub(crate) fn sample_scores() -> ScoreMap {
        let activity = [
            ("alice", ActivityRecord::new(2, 1, 0, 3, 0)),
            ("bob", ActivityRecord::new(1, 0, 0, 0, 1)),
            ("carol", ActivityRecord::new(0, 0, 0, 0, 5)),
        ]
        .into_iter()
        .map(|(login, record)| (login.to_string(), record))
        .collect();
        ScoreAnalyzer::new(ScoringPolicy::Capped).score_all(&activity)
    }

    #[test]
    fn file_names_follow_label() {
        let target = ReportTarget::repo("out", &RepoId::new("near", "core"));
        assert_eq!(target.path("csv"), PathBuf::from("out/near_core.csv"));
        assert_eq!(target.state_path(), PathBuf::from("out/near_core_state.csv"));
        assert_eq!(
            ReportTarget::total("out").path("png"),
            PathBuf::from("out/total.png")
        );
    }

    #[test]
    fn rows_are_ranked_with_rates() {
        let rows = report_rows(&sample_scores());
        let logins: Vec<_> = rows.iter().map(|row| row.login.as_str()).collect();
        assert_eq!(logins, ["alice", "bob", "carol"]);
        assert_eq!(rows[0].total, 14);
        assert_eq!(rows[0].rates.pr_rate, 75.0);
        assert_eq!(rows[2].rank, 3);
    }
}
