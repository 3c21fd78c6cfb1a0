use std::path::Path;

use anyhow::Context;
use shared::{
    RunStatistics, ScoringPolicy, DOC_ISSUE_POINTS, DOC_PR_POINTS, DOC_TYPO_PR_RATIO,
    FEATURE_FIX_ISSUE_POINTS, FEATURE_FIX_PR_POINTS, ISSUE_RATIO, TYPO_PR_POINTS,
};

use crate::ReportRow;

pub const HEADER: [&str; 9] = [
    "User",
    "f/b_PR",
    "doc_PR",
    "typo",
    "f/b_issue",
    "doc_issue",
    "PR_rate",
    "IS_rate",
    "total",
];

fn legend(policy: ScoringPolicy, statistics: Option<&RunStatistics>) -> String {
    let mut legend = format!(
        "# Scoring policy: {policy}\n\
         # Points: f/b PR={FEATURE_FIX_PR_POINTS}, doc PR={DOC_PR_POINTS}, typo PR={TYPO_PR_POINTS}, \
         f/b issue={FEATURE_FIX_ISSUE_POINTS}, doc issue={DOC_ISSUE_POINTS}\n"
    );
    if policy == ScoringPolicy::Capped {
        legend.push_str(&format!(
            "# Caps: doc+typo PRs <= {DOC_TYPO_PR_RATIO} x max(f/b PRs, 1), \
             issues <= {ISSUE_RATIO} x credited PRs\n"
        ));
    }
    if let Some(statistics) = statistics {
        legend.push_str(&format!(
            "# Statistics: merged PRs={}, unmerged PRs={}, open issues={}, closed issues={}, excluded={}\n",
            statistics.merged_prs,
            statistics.unmerged_prs,
            statistics.open_issues,
            statistics.closed_issues,
            statistics.excluded_items
        ));
    }
    legend
}

pub fn render_csv(
    rows: &[ReportRow],
    policy: ScoringPolicy,
    statistics: Option<&RunStatistics>,
) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([
            row.login.clone(),
            row.activity.pr_feature_fix.to_string(),
            row.activity.pr_doc.to_string(),
            row.activity.pr_typo.to_string(),
            row.activity.issue_feature_fix.to_string(),
            row.activity.issue_doc.to_string(),
            format!("{:.2}", row.rates.pr_rate),
            format!("{:.2}", row.rates.is_rate),
            row.total.to_string(),
        ])?;
    }
    let body = String::from_utf8(writer.into_inner()?)?;

    Ok(legend(policy, statistics) + &body)
}

/// Run statistics of one score set as `Metric,Count` rows.
pub fn render_state(statistics: &RunStatistics) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Metric", "Count"])?;
    for (metric, count) in [
        ("merged_prs", statistics.merged_prs),
        ("unmerged_prs", statistics.unmerged_prs),
        ("open_issues", statistics.open_issues),
        ("closed_issues", statistics.closed_issues),
        ("excluded_items", statistics.excluded_items),
    ] {
        writer.write_record([metric.to_string(), count.to_string()])?;
    }
    Ok(String::from_utf8(writer.into_inner()?)?)
}

pub fn write_file(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
