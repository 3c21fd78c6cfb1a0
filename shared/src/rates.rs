use std::collections::BTreeMap;

use crate::{GithubHandle, ScoreMap};

/// A user's share of all PRs and issues in one score set, in percent.
/// Only used for display; never feeds back into the total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rates {
    pub pr_rate: f64,
    pub is_rate: f64,
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn rates(scores: &ScoreMap) -> BTreeMap<GithubHandle, Rates> {
    let (pr_total, issue_total) = scores.values().fold((0u64, 0u64), |(prs, issues), score| {
        (
            prs.saturating_add(score.activity().pr_count()),
            issues.saturating_add(score.activity().issue_count()),
        )
    });

    scores
        .iter()
        .map(|(login, score)| {
            (
                login.clone(),
                Rates {
                    pr_rate: percentage(score.activity().pr_count(), pr_total),
                    is_rate: percentage(score.activity().issue_count(), issue_total),
                },
            )
        })
        .collect()
}
