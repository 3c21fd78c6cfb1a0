use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Kind of tracker item an activity was counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    PullRequest,
    Issue,
}

/// Category assigned to an item by the label policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    FeatureFix,
    Doc,
    Typo,
}

/// Raw per-user counters for one repository.
///
/// Built once by the collector and never modified afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub pr_feature_fix: u32,
    pub pr_doc: u32,
    pub pr_typo: u32,
    pub issue_feature_fix: u32,
    pub issue_doc: u32,
}

impl ActivityRecord {
    pub const fn new(
        pr_feature_fix: u32,
        pr_doc: u32,
        pr_typo: u32,
        issue_feature_fix: u32,
        issue_doc: u32,
    ) -> Self {
        Self {
            pr_feature_fix,
            pr_doc,
            pr_typo,
            issue_feature_fix,
            issue_doc,
        }
    }

    /// Widened so that counters near `u32::MAX` cannot overflow.
    pub const fn pr_count(&self) -> u64 {
        self.pr_feature_fix as u64 + self.pr_doc as u64 + self.pr_typo as u64
    }

    pub const fn issue_count(&self) -> u64 {
        self.issue_feature_fix as u64 + self.issue_doc as u64
    }

    pub const fn is_empty(&self) -> bool {
        self.pr_count() == 0 && self.issue_count() == 0
    }
}

/// Accumulates counted items for a single user and is finalized once into an [`ActivityRecord`].
#[derive(Debug, Clone, Default)]
pub struct ActivityBuilder {
    record: ActivityRecord,
}

impl ActivityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one item. Returns `false` when the combination does not count
    /// towards any category (typo-labelled issues).
    pub fn record(&mut self, kind: ItemKind, category: Category) -> bool {
        let counter = match (kind, category) {
            (ItemKind::PullRequest, Category::FeatureFix) => &mut self.record.pr_feature_fix,
            (ItemKind::PullRequest, Category::Doc) => &mut self.record.pr_doc,
            (ItemKind::PullRequest, Category::Typo) => &mut self.record.pr_typo,
            (ItemKind::Issue, Category::FeatureFix) => &mut self.record.issue_feature_fix,
            (ItemKind::Issue, Category::Doc) => &mut self.record.issue_doc,
            (ItemKind::Issue, Category::Typo) => return false,
        };
        *counter = counter.saturating_add(1);
        true
    }

    pub fn build(self) -> ActivityRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_counts_each_category() {
        let mut builder = ActivityBuilder::new();
        assert!(builder.record(ItemKind::PullRequest, Category::FeatureFix));
        assert!(builder.record(ItemKind::PullRequest, Category::FeatureFix));
        assert!(builder.record(ItemKind::PullRequest, Category::Doc));
        assert!(builder.record(ItemKind::PullRequest, Category::Typo));
        assert!(builder.record(ItemKind::Issue, Category::FeatureFix));
        assert!(builder.record(ItemKind::Issue, Category::Doc));

        assert_eq!(builder.build(), ActivityRecord::new(2, 1, 1, 1, 1));
    }

    #[test]
    fn typo_issues_are_not_counted() {
        let mut builder = ActivityBuilder::new();
        assert!(!builder.record(ItemKind::Issue, Category::Typo));
        assert!(builder.build().is_empty());
    }

    #[test]
    fn counts_do_not_overflow_near_u32_max() {
        let record = ActivityRecord::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX, 1);
        assert_eq!(record.pr_count(), 3 * u64::from(u32::MAX));
        assert_eq!(record.issue_count(), u64::from(u32::MAX) + 1);
        assert!(!record.is_empty());
    }

    #[test]
    fn cache_format_uses_camel_case() {
        let record = ActivityRecord::new(1, 2, 3, 4, 5);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"prFeatureFix":1,"prDoc":2,"prTypo":3,"issueFeatureFix":4,"issueDoc":5}"#
        );
        let back: ActivityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
