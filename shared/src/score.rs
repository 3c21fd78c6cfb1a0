use std::ops::Add;

use strum::{Display, EnumIter, EnumString};

use crate::{ActivityMap, ActivityRecord, ScoreMap};

pub const FEATURE_FIX_PR_POINTS: u64 = 3;
pub const DOC_PR_POINTS: u64 = 2;
pub const TYPO_PR_POINTS: u64 = 1;
pub const FEATURE_FIX_ISSUE_POINTS: u64 = 2;
pub const DOC_ISSUE_POINTS: u64 = 1;

/// Doc and typo PRs are credited up to this many times the feature/fix PR count
/// (and up to this many when there are no feature/fix PRs at all).
pub const DOC_TYPO_PR_RATIO: u64 = 3;
/// Issues are credited up to this many times the credited PR count.
pub const ISSUE_RATIO: u64 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScoringPolicy {
    /// Low-effort categories are capped relative to feature/fix work.
    #[default]
    Capped,
    /// Plain weighted sum of every counter. Kept for comparison with old reports.
    Flat,
}

impl ScoringPolicy {
    pub fn total(&self, record: &ActivityRecord) -> u64 {
        match self {
            ScoringPolicy::Capped => capped_total(record),
            ScoringPolicy::Flat => flat_total(record),
        }
    }
}

pub fn flat_total(record: &ActivityRecord) -> u64 {
    record.pr_feature_fix as u64 * FEATURE_FIX_PR_POINTS
        + record.pr_doc as u64 * DOC_PR_POINTS
        + record.pr_typo as u64 * TYPO_PR_POINTS
        + record.issue_feature_fix as u64 * FEATURE_FIX_ISSUE_POINTS
        + record.issue_doc as u64 * DOC_ISSUE_POINTS
}

pub fn capped_total(record: &ActivityRecord) -> u64 {
    CappedBreakdown::from_record(record).total()
}

/// Credited units per category after the anti-farming caps are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CappedBreakdown {
    pub p_valid: u64,
    pub i_valid: u64,
    pub pr_feature_fix: u64,
    pub pr_doc: u64,
    pub pr_typo: u64,
    pub issue_feature_fix: u64,
    pub issue_doc: u64,
}

impl CappedBreakdown {
    pub fn from_record(record: &ActivityRecord) -> Self {
        let feature_fix = record.pr_feature_fix as u64;
        let doc = record.pr_doc as u64;
        let typo = record.pr_typo as u64;
        let issue_feature_fix = record.issue_feature_fix as u64;
        let issue_doc = record.issue_doc as u64;

        let p_valid = feature_fix + (doc + typo).min(DOC_TYPO_PR_RATIO * feature_fix.max(1));
        let i_valid = (issue_feature_fix + issue_doc).min(ISSUE_RATIO * p_valid);

        // Credit goes to the most valuable category first.
        let p_feature_fix = feature_fix.min(p_valid);
        let p_doc = doc.min(p_valid - feature_fix);
        let p_typo = p_valid - p_feature_fix - p_doc;

        let i_feature_fix = issue_feature_fix.min(i_valid);
        let i_doc = i_valid - i_feature_fix;

        Self {
            p_valid,
            i_valid,
            pr_feature_fix: p_feature_fix,
            pr_doc: p_doc,
            pr_typo: p_typo,
            issue_feature_fix: i_feature_fix,
            issue_doc: i_doc,
        }
    }

    pub fn total(&self) -> u64 {
        self.pr_feature_fix * FEATURE_FIX_PR_POINTS
            + self.pr_doc * DOC_PR_POINTS
            + self.pr_typo * TYPO_PR_POINTS
            + self.issue_feature_fix * FEATURE_FIX_ISSUE_POINTS
            + self.issue_doc * DOC_ISSUE_POINTS
    }
}

/// Raw counters of a user together with the derived total.
///
/// The counters are always the uncapped ones, so with the capped policy `total`
/// is not a linear function of the counters shown next to it. Values are only
/// produced by [`ScoreAnalyzer`] or by adding two models together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScoreModel {
    activity: ActivityRecord,
    total: u64,
}

impl ScoreModel {
    pub fn activity(&self) -> &ActivityRecord {
        &self.activity
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Add for ActivityRecord {
    type Output = ActivityRecord;

    fn add(self, other: ActivityRecord) -> ActivityRecord {
        ActivityRecord {
            pr_feature_fix: self.pr_feature_fix.saturating_add(other.pr_feature_fix),
            pr_doc: self.pr_doc.saturating_add(other.pr_doc),
            pr_typo: self.pr_typo.saturating_add(other.pr_typo),
            issue_feature_fix: self.issue_feature_fix.saturating_add(other.issue_feature_fix),
            issue_doc: self.issue_doc.saturating_add(other.issue_doc),
        }
    }
}

/// Component-wise sum. `total` is summed as well, never recomputed from the summed counters.
impl Add for ScoreModel {
    type Output = ScoreModel;

    fn add(self, other: ScoreModel) -> ScoreModel {
        ScoreModel {
            activity: self.activity + other.activity,
            total: self.total.saturating_add(other.total),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAnalyzer {
    policy: ScoringPolicy,
}

impl ScoreAnalyzer {
    pub const fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn score(&self, record: &ActivityRecord) -> ScoreModel {
        ScoreModel {
            activity: *record,
            total: self.policy.total(record),
        }
    }

    pub fn score_all(&self, activity: &ActivityMap) -> ScoreMap {
        activity
            .iter()
            .map(|(user, record)| (user.clone(), self.score(record)))
            .collect()
    }

    /// Combines per-repository scores into one map, summing every field per user.
    pub fn aggregate<'a>(per_repo: impl IntoIterator<Item = &'a ScoreMap>) -> ScoreMap {
        per_repo
            .into_iter()
            .fold(ScoreMap::new(), |mut total, scores| {
                Self::merge_into(&mut total, scores);
                total
            })
    }

    pub fn merge_into(total: &mut ScoreMap, scores: &ScoreMap) {
        for (user, score) in scores {
            total
                .entry(user.clone())
                .and_modify(|acc| *acc = *acc + *score)
                .or_insert(*score);
        }
    }
}
