use std::{collections::BTreeSet, path::PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use fairscore_collector::{CollectOptions, RetryPolicy};
use fairscore_report::{parse_formats, OutputFormat};
use shared::{first_label_wins, LabelSet, RepoId, ScoringPolicy, UserInfo};

/// Scores contributors of GitHub repositories, capping low-effort contributions
/// relative to feature and bug-fix work.
#[derive(Debug, Parser)]
#[command(name = "fairscore", version, about)]
pub struct Args {
    /// Repositories to score, as `owner/repo`.
    #[arg(required = true, value_name = "OWNER/REPO")]
    pub repos: Vec<String>,

    /// Directory receiving every report file.
    #[arg(short, long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Output formats: text, csv, chart, html or all. Repeatable or comma-separated.
    #[arg(short, long = "format", default_value = "text")]
    pub formats: Vec<String>,

    /// GitHub token. Falls back to `GITHUB_TOKEN`.
    #[arg(long)]
    pub token: Option<String>,

    /// Only report these users (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub users: Vec<String>,

    /// Only count items created on or after this date (YYYY-MM-DD).
    #[arg(long)]
    pub since: Option<String>,

    /// Only count items created on or before this date (YYYY-MM-DD).
    #[arg(long)]
    pub until: Option<String>,

    /// JSON object or two-column CSV mapping logins to display names.
    #[arg(long)]
    pub user_info: Option<PathBuf>,

    /// Reuse activity cached by an earlier run.
    #[arg(long)]
    pub cache: bool,

    /// Cache location. Defaults to `<output-dir>/.cache`.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Print a single user's scores instead of writing reports.
    #[arg(long)]
    pub user: Option<String>,

    /// Show a progress spinner while fetching.
    #[arg(long)]
    pub progress: bool,

    /// Scoring policy: capped or flat.
    #[arg(long, default_value = "capped")]
    pub policy: String,

    /// TOML file overriding the label sets.
    #[arg(long)]
    pub labels: Option<PathBuf>,
}

/// Everything a run needs, checked before any network access.
#[derive(Debug)]
pub struct RunConfig {
    pub repos: Vec<RepoId>,
    pub output_dir: PathBuf,
    pub formats: BTreeSet<OutputFormat>,
    pub users: Vec<String>,
    pub user_info: Option<UserInfo>,
    pub single_user: Option<String>,
    pub policy: ScoringPolicy,
    pub collect: CollectOptions,
}

fn parse_date(value: &str, flag: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {flag} date {value:?}, expected YYYY-MM-DD"))
}

impl Args {
    pub fn validate(&self) -> anyhow::Result<RunConfig> {
        let repos = self
            .repos
            .iter()
            .map(|repo| repo.parse::<RepoId>())
            .collect::<anyhow::Result<Vec<_>>>()?;

        let since = self
            .since
            .as_deref()
            .map(|date| parse_date(date, "--since"))
            .transpose()?;
        let until = self
            .until
            .as_deref()
            .map(|date| parse_date(date, "--until"))
            .transpose()?;
        if let (Some(since), Some(until)) = (since, until) {
            if until < since {
                bail!("--until {until} is earlier than --since {since}");
            }
        }

        let formats = parse_formats(&self.formats)?;
        let Ok(policy) = self.policy.parse::<ScoringPolicy>() else {
            bail!("Unknown policy {:?}, expected capped or flat", self.policy);
        };

        let user_info = self
            .user_info
            .as_deref()
            .map(UserInfo::load_from_file)
            .transpose()?;
        let labels = match &self.labels {
            Some(path) => LabelSet::load_from_file(path)?,
            None => LabelSet::default(),
        };

        let users = self
            .users
            .iter()
            .map(|user| user.trim().to_string())
            .filter(|user| !user.is_empty())
            .collect();

        Ok(RunConfig {
            repos,
            formats,
            users,
            user_info,
            single_user: self.user.clone(),
            policy,
            collect: CollectOptions {
                since,
                until,
                use_cache: self.cache,
                cache_dir: self
                    .cache_dir
                    .clone()
                    .unwrap_or_else(|| self.output_dir.join(".cache")),
                labels,
                label_policy: first_label_wins,
                retry: RetryPolicy::default(),
                show_progress: self.progress,
            },
            output_dir: self.output_dir.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(["fairscore", "near/core"].iter().chain(extra)).unwrap()
    }

    #[test]
    fn defaults() {
        let config = args(&[]).validate().unwrap();
        assert_eq!(config.repos, vec![RepoId::new("near", "core")]);
        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.formats, BTreeSet::from([OutputFormat::Text]));
        assert_eq!(config.policy, ScoringPolicy::Capped);
        assert_eq!(config.collect.cache_dir, PathBuf::from("./output/.cache"));
        assert!(config.users.is_empty());
        assert!(!config.collect.use_cache);
    }

    #[test]
    fn parses_every_flag() {
        let config = args(&[
            "-o",
            "reports",
            "-f",
            "csv,chart",
            "--format",
            "html",
            "--users",
            "alice, bob",
            "--since",
            "2024-01-01",
            "--until",
            "2024-06-30",
            "--cache",
            "--policy",
            "FLAT",
            "--user",
            "alice",
        ])
        .validate()
        .unwrap();

        assert_eq!(config.formats.len(), 3);
        assert_eq!(config.users, ["alice", "bob"]);
        assert_eq!(config.collect.since, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(config.collect.until, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(config.collect.use_cache);
        assert_eq!(config.collect.cache_dir, PathBuf::from("reports/.cache"));
        assert_eq!(config.policy, ScoringPolicy::Flat);
        assert_eq!(config.single_user.as_deref(), Some("alice"));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(args(&["--since", "2024-13-01"]).validate().is_err());
        assert!(args(&["--since", "2024-05-02", "--until", "2024-05-01"])
            .validate()
            .is_err());
        assert!(args(&["-f", "pdf"]).validate().is_err());
        assert!(args(&["-f", "c:sv"]).validate().is_err());
        assert!(args(&["--policy", "generous"]).validate().is_err());
        assert!(args(&["--user-info", "missing.json"]).validate().is_err());
        assert!(Args::try_parse_from(["fairscore", "near"])
            .unwrap()
            .validate()
            .is_err());
    }

    #[test]
    fn same_day_range_is_valid() {
        assert!(args(&["--since", "2024-05-01", "--until", "2024-05-01"])
            .validate()
            .is_ok());
    }

    #[test]
    fn loads_user_info_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let user_info = dir.path().join("users.csv");
        std::fs::File::create(&user_info)
            .unwrap()
            .write_all(b"login,name\nalice,Alice A.\n")
            .unwrap();
        let labels = dir.path().join("labels.toml");
        std::fs::write(&labels, "typo = [\"spelling\"]\n").unwrap();

        let config = args(&[
            "--user-info",
            user_info.to_str().unwrap(),
            "--labels",
            labels.to_str().unwrap(),
        ])
        .validate()
        .unwrap();

        assert_eq!(
            config.user_info.unwrap().display_name("ALICE"),
            "Alice A."
        );
        assert_eq!(config.collect.labels.typo, ["spelling"]);
    }
}
