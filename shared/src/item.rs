use chrono::{DateTime, NaiveDate, Utc};

use crate::{GithubHandle, ItemKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Open,
    Merged,
    /// Closed without merging (pull requests) or with a resolution (issues).
    Closed {
        completed: bool,
    },
}

/// A pull request or issue reduced to what scoring needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedItem {
    pub kind: ItemKind,
    pub number: u64,
    pub author: GithubHandle,
    pub labels: Vec<String>,
    pub created: DateTime<Utc>,
    pub state: ItemState,
}

impl TrackedItem {
    /// Merged pull requests, and issues that are open or were closed as completed.
    pub fn qualifies(&self) -> bool {
        match (self.kind, self.state) {
            (ItemKind::PullRequest, ItemState::Merged) => true,
            (ItemKind::PullRequest, _) => false,
            (ItemKind::Issue, ItemState::Open) => true,
            (ItemKind::Issue, ItemState::Closed { completed }) => completed,
            (ItemKind::Issue, ItemState::Merged) => false,
        }
    }

    /// Inclusive on both ends, compared by UTC calendar date of creation.
    pub fn created_within(&self, since: Option<NaiveDate>, until: Option<NaiveDate>) -> bool {
        let created = self.created.date_naive();
        since.map_or(true, |since| created >= since) && until.map_or(true, |until| created <= until)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn item(kind: ItemKind, state: ItemState) -> TrackedItem {
        TrackedItem {
            kind,
            number: 1,
            author: "alice".to_string(),
            labels: vec![],
            created: Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap(),
            state,
        }
    }

    #[test]
    fn only_merged_pull_requests_qualify() {
        assert!(item(ItemKind::PullRequest, ItemState::Merged).qualifies());
        assert!(!item(ItemKind::PullRequest, ItemState::Open).qualifies());
        assert!(!item(ItemKind::PullRequest, ItemState::Closed { completed: false }).qualifies());
    }

    #[test]
    fn open_and_completed_issues_qualify() {
        assert!(item(ItemKind::Issue, ItemState::Open).qualifies());
        assert!(item(ItemKind::Issue, ItemState::Closed { completed: true }).qualifies());
        assert!(!item(ItemKind::Issue, ItemState::Closed { completed: false }).qualifies());
    }

    #[test]
    fn date_range_is_inclusive() {
        let item = item(ItemKind::Issue, ItemState::Open);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        assert!(item.created_within(None, None));
        assert!(item.created_within(Some(day), Some(day)));
        assert!(!item.created_within(Some(next), None));
        assert!(!item.created_within(None, day.pred_opt()));
    }
}
