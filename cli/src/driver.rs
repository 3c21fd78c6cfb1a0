use fairscore_collector::ActivitySource;
use fairscore_report::{report_rows, HtmlTab, ReportRow, ReportTarget, Reporter};
use shared::{filter_users, find_user, RunStatistics, ScoreAnalyzer, ScoreMap};
use tracing::{error, info, warn};

use crate::args::RunConfig;

/// What happened to each repository of a run.
#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    pub scored: Vec<String>,
    pub failed: Vec<String>,
    pub total: ScoreMap,
    pub total_written: bool,
}

fn describe(row: &ReportRow) -> String {
    format!(
        "#{} {} total={} (f/b PR {}, doc PR {}, typo {}, f/b issue {}, doc issue {})",
        row.rank,
        row.login,
        row.total,
        row.activity.pr_feature_fix,
        row.activity.pr_doc,
        row.activity.pr_typo,
        row.activity.issue_feature_fix,
        row.activity.issue_doc,
    )
}

/// The line printed by `--user` for one score set.
pub fn user_line(title: &str, scores: &ScoreMap, user: &str) -> String {
    let row = find_user(scores, user).and_then(|(login, _)| {
        report_rows(scores)
            .into_iter()
            .find(|row| &row.login == login)
    });
    match row {
        Some(row) => format!("{title}: {}", describe(&row)),
        None => format!("{title}: {user} has no counted contributions"),
    }
}

/// Applies the user filter on logins, then renames to display names.
fn prepare(config: &RunConfig, scores: ScoreMap) -> ScoreMap {
    let scores = filter_users(&scores, &config.users);
    match &config.user_info {
        Some(user_info) => user_info.remap(scores),
        None => scores,
    }
}

/// Collects, scores and renders every repository in order, then the total.
/// A failing repository is logged and skipped.
pub async fn run(
    config: &RunConfig,
    source: &dyn ActivitySource,
    reporter: &Reporter,
) -> RunSummary {
    let analyzer = ScoreAnalyzer::new(config.policy);
    let single_user = config.single_user.as_deref().map(|user| match &config.user_info {
        Some(user_info) => user_info.display_name(user).to_string(),
        None => user.to_string(),
    });

    let mut summary = RunSummary::default();
    let mut statistics: Option<RunStatistics> = None;
    let mut cached = Vec::new();
    let mut tabs: Vec<HtmlTab> = Vec::new();

    for repo in &config.repos {
        let collection = match source.collect(repo, &config.collect).await {
            Ok(collection) => collection,
            Err(e) => {
                error!("Skipping {repo}: {e}");
                summary.failed.push(repo.to_string());
                continue;
            }
        };

        let scores = prepare(config, analyzer.score_all(&collection.activity));
        info!("Scored {} contributors of {repo}", scores.len());

        if let Some(user) = &single_user {
            println!("{}", user_line(&repo.to_string(), &scores, user));
        } else {
            let target = ReportTarget::repo(&config.output_dir, repo);
            let title = repo.to_string();
            match reporter.render(&target, &title, &scores, collection.statistics.as_ref()) {
                Ok(tab) => tabs.extend(tab),
                Err(e) => {
                    error!("Failed to write reports for {repo}: {e:#}");
                    summary.failed.push(repo.to_string());
                    continue;
                }
            }
        }

        match collection.statistics {
            Some(repo_statistics) => {
                statistics = Some(statistics.unwrap_or_default() + repo_statistics);
            }
            None => cached.push(repo.to_string()),
        }
        ScoreAnalyzer::merge_into(&mut summary.total, &scores);
        summary.scored.push(repo.to_string());
    }

    if summary.scored.is_empty() {
        warn!("No repository could be scored");
    }

    if let Some(user) = &single_user {
        println!("{}", user_line("total", &summary.total, user));
        summary.total_written = true;
        return summary;
    }

    // Cached repositories carry no statistics; a sum over the rest is partial.
    if !cached.is_empty() {
        warn!("No total statistics: {} served from cache", cached.join(", "));
        statistics = None;
    }

    let target = ReportTarget::total(&config.output_dir);
    match reporter.render_total(&target, &summary.total, statistics.as_ref(), &tabs) {
        Ok(()) => summary.total_written = true,
        Err(e) => error!("Failed to write total report: {e:#}"),
    }
    summary
}
