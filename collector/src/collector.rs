use std::{future::Future, path::PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    first_label_wins, ActivityMap, LabelPolicy, LabelSet, RepoId, RunStatistics, TrackedItem,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    client::PER_PAGE, progress::Progress, tally::Tally, ActivityCache, CollectError,
    GithubClient, RetryPolicy,
};

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub use_cache: bool,
    pub cache_dir: PathBuf,
    pub labels: LabelSet,
    pub label_policy: LabelPolicy,
    pub retry: RetryPolicy,
    pub show_progress: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            use_cache: false,
            cache_dir: PathBuf::from("output/.cache"),
            labels: LabelSet::default(),
            label_policy: first_label_wins,
            retry: RetryPolicy::default(),
            show_progress: false,
        }
    }
}

/// Per-user activity of one repository. Statistics are only known for fresh
/// collections; a cache hit carries none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub activity: ActivityMap,
    pub statistics: Option<RunStatistics>,
}

#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn collect(
        &self,
        repo: &RepoId,
        options: &CollectOptions,
    ) -> Result<Collection, CollectError>;
}

/// Collects activity from the GitHub REST API, one repository at a time.
pub struct Collector<'a> {
    client: &'a GithubClient,
}

impl<'a> Collector<'a> {
    pub fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    async fn pull_requests(
        &self,
        repo: &RepoId,
        options: &CollectOptions,
        progress: &Progress,
    ) -> Result<Vec<TrackedItem>, CollectError> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let pulls = options
                .retry
                .run(&format!("Fetching pull requests of {repo}"), || {
                    self.client.pull_requests_page(repo, page)
                })
                .await?;
            let fetched = pulls.len();

            let mut reached_since = false;
            for pull in pulls {
                let number = pull.number;
                match TrackedItem::try_from(pull) {
                    Ok(item) => {
                        reached_since |= before(&item, options.since);
                        items.push(item);
                    }
                    Err(e) => warn!("Skipping pull request #{number} of {repo}: {e}"),
                }
            }

            progress.page("pull requests", page, items.len());
            if fetched < PER_PAGE as usize || reached_since {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} pull requests of {repo}", items.len());
        Ok(items)
    }

    async fn issues(
        &self,
        repo: &RepoId,
        options: &CollectOptions,
        progress: &Progress,
    ) -> Result<Vec<TrackedItem>, CollectError> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let issues = options
                .retry
                .run(&format!("Fetching issues of {repo}"), || {
                    self.client.issues_page(repo, page, options.since)
                })
                .await?;
            let fetched = issues.len();

            let mut reached_since = false;
            for issue in issues.into_iter().filter(|issue| !issue.is_pull_request()) {
                let number = issue.number;
                match TrackedItem::try_from(issue) {
                    Ok(item) => {
                        reached_since |= before(&item, options.since);
                        items.push(item);
                    }
                    Err(e) => warn!("Skipping issue #{number} of {repo}: {e}"),
                }
            }

            progress.page("issues", page, items.len());
            if fetched < PER_PAGE as usize || reached_since {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} issues of {repo}", items.len());
        Ok(items)
    }

    async fn fetch(
        &self,
        repo: &RepoId,
        options: &CollectOptions,
    ) -> Result<Collection, CollectError> {
        let progress = Progress::new(options.show_progress, &repo.to_string());
        let pulls = self.pull_requests(repo, options, &progress).await?;
        let issues = self.issues(repo, options, &progress).await?;

        let mut tally = Tally::new(&options.labels, options.label_policy);
        for item in pulls
            .iter()
            .chain(issues.iter())
            .filter(|item| item.created_within(options.since, options.until))
        {
            tally.add(item);
        }
        let (activity, statistics) = tally.finish();

        progress.finish(format!(
            "{} pull requests, {} issues, {} contributors",
            statistics.total_prs(),
            statistics.total_issues(),
            activity.len()
        ));

        Ok(Collection {
            activity,
            statistics: Some(statistics),
        })
    }
}

/// Listings are sorted by creation, newest first, so one item created before
/// `since` means every later page is out of range too.
fn before(item: &TrackedItem, since: Option<NaiveDate>) -> bool {
    since.is_some_and(|since| item.created.date_naive() < since)
}

/// Serves `repo` from the cache when allowed, otherwise runs `fetch` and
/// caches its activity. Cache failures are logged and never fail the collection.
async fn through_cache<F, Fut>(
    repo: &RepoId,
    options: &CollectOptions,
    fetch: F,
) -> Result<Collection, CollectError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Collection, CollectError>>,
{
    let cache = ActivityCache::new(&options.cache_dir);
    if options.use_cache {
        match cache.load(repo) {
            Ok(Some(activity)) => {
                info!("Using cached activity for {repo}");
                return Ok(Collection {
                    activity,
                    statistics: None,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable cache for {repo}: {e:#}"),
        }
    }

    info!("Collecting activity for {repo}");
    let collection = fetch().await?;

    if let Err(e) = cache.store(repo, &collection.activity) {
        warn!("Failed to cache activity for {repo}: {e:#}");
    }

    Ok(collection)
}

#[async_trait]
impl ActivitySource for Collector<'_> {
    #[instrument(skip(self, options), fields(repo = %repo))]
    async fn collect(
        &self,
        repo: &RepoId,
        options: &CollectOptions,
    ) -> Result<Collection, CollectError> {
        through_cache(repo, options, || self.fetch(repo, options)).await
    }
}
