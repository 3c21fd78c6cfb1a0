use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{ItemKind, ItemState, TrackedItem};

impl TryFrom<octocrab::models::pulls::PullRequest> for TrackedItem {
    type Error = anyhow::Error;

    fn try_from(pr: octocrab::models::pulls::PullRequest) -> anyhow::Result<Self> {
        let state = match (pr.merged_at, pr.closed_at) {
            (Some(_), _) => ItemState::Merged,
            (None, Some(_)) => ItemState::Closed { completed: false },
            (None, None) => ItemState::Open,
        };

        if let (Some(user), Some(created)) = (pr.user, pr.created_at) {
            Ok(Self {
                kind: ItemKind::PullRequest,
                number: pr.number,
                author: user.login,
                labels: pr
                    .labels
                    .unwrap_or_default()
                    .into_iter()
                    .map(|label| label.name)
                    .collect(),
                created,
                state,
            })
        } else {
            Err(anyhow::anyhow!("PR #{} is missing required fields", pr.number))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
}

/// Issue as returned by `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub number: u64,
    pub user: Option<UserPayload>,
    #[serde(default)]
    pub labels: Vec<LabelPayload>,
    pub state: String,
    pub state_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Present when the entry is a pull request.
    pub pull_request: Option<serde_json::Value>,
}

impl IssuePayload {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl TryFrom<IssuePayload> for TrackedItem {
    type Error = anyhow::Error;

    fn try_from(issue: IssuePayload) -> anyhow::Result<Self> {
        if issue.is_pull_request() {
            anyhow::bail!("#{} is a pull request", issue.number);
        }

        let state = match issue.state.as_str() {
            "open" => ItemState::Open,
            "closed" => ItemState::Closed {
                completed: issue.state_reason.as_deref() == Some("completed"),
            },
            other => anyhow::bail!("Issue #{} has unknown state {other}", issue.number),
        };
        let user = issue
            .user
            .ok_or_else(|| anyhow::anyhow!("Issue #{} has no author", issue.number))?;

        Ok(Self {
            kind: ItemKind::Issue,
            number: issue.number,
            author: user.login,
            labels: issue.labels.into_iter().map(|label| label.name).collect(),
            created: issue.created_at,
            state,
        })
    }
}
