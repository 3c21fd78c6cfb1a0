use chrono::NaiveDate;
use octocrab::{
    models::pulls::PullRequest,
    params::{pulls::Sort, Direction, State},
    Octocrab,
};
use serde::Serialize;
use shared::{github::IssuePayload, RepoId};
use tracing::instrument;

use crate::CollectError;

pub const PER_PAGE: u8 = 100;

/// GitHub API client shared by every collector of a run.
#[derive(Clone)]
pub struct GithubClient {
    octocrab: Octocrab,
}

#[derive(Serialize)]
struct IssueQuery {
    state: &'static str,
    sort: &'static str,
    direction: &'static str,
    per_page: u8,
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<String>,
}

impl GithubClient {
    /// Anonymous access works for public repositories at a much lower rate limit.
    pub fn new(github_token: Option<String>) -> anyhow::Result<Self> {
        let builder = Octocrab::builder();
        let builder = match github_token {
            Some(token) => builder.personal_token(token),
            None => builder,
        };

        Ok(Self {
            octocrab: builder.build()?,
        })
    }

    /// Pull requests of every state, newest first.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn pull_requests_page(
        &self,
        repo: &RepoId,
        page: u32,
    ) -> Result<Vec<PullRequest>, CollectError> {
        let mut page = self
            .octocrab
            .pulls(&repo.owner, &repo.repo)
            .list()
            .state(State::All)
            .sort(Sort::Created)
            .direction(Direction::Descending)
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await?;

        Ok(page.take_items())
    }

    /// Issues of every state, newest first. The listing also contains pull
    /// requests, which callers have to skip.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn issues_page(
        &self,
        repo: &RepoId,
        page: u32,
        since: Option<NaiveDate>,
    ) -> Result<Vec<IssuePayload>, CollectError> {
        let route = format!("/repos/{}/{}/issues", repo.owner, repo.repo);
        let query = IssueQuery {
            state: "all",
            sort: "created",
            direction: "desc",
            per_page: PER_PAGE,
            page,
            // `since` filters on update time, which is never earlier than creation.
            since: since.map(|date| format!("{date}T00:00:00Z")),
        };

        Ok(self.octocrab.get(route, Some(&query)).await?)
    }
}
