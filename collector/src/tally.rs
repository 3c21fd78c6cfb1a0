use std::collections::BTreeMap;

use shared::{
    classify, ActivityBuilder, ActivityMap, GithubHandle, ItemKind, ItemState, LabelPolicy,
    LabelSet, RunStatistics, TrackedItem,
};
use tracing::trace;

/// Single pass over collected items producing per-user activity and run statistics.
pub struct Tally<'a> {
    labels: &'a LabelSet,
    policy: LabelPolicy,
    builders: BTreeMap<GithubHandle, ActivityBuilder>,
    statistics: RunStatistics,
}

impl<'a> Tally<'a> {
    pub fn new(labels: &'a LabelSet, policy: LabelPolicy) -> Self {
        Self {
            labels,
            policy,
            builders: BTreeMap::new(),
            statistics: RunStatistics::default(),
        }
    }

    pub fn add(&mut self, item: &TrackedItem) {
        match (item.kind, item.state) {
            (ItemKind::PullRequest, ItemState::Merged) => self.statistics.merged_prs += 1,
            (ItemKind::PullRequest, _) => self.statistics.unmerged_prs += 1,
            (ItemKind::Issue, ItemState::Open) => self.statistics.open_issues += 1,
            (ItemKind::Issue, _) => self.statistics.closed_issues += 1,
        }

        if self.labels.is_rejected(&item.labels) {
            trace!("Skipping {} #{}: rejected label", item.kind, item.number);
            self.statistics.excluded_items += 1;
            return;
        }

        if !item.qualifies() {
            return;
        }

        if let Some(category) = classify(self.labels, self.policy, item.kind, &item.labels) {
            self.builders
                .entry(item.author.clone())
                .or_default()
                .record(item.kind, category);
        }
    }

    /// Users without any counted item are dropped.
    pub fn finish(self) -> (ActivityMap, RunStatistics) {
        let activity = self
            .builders
            .into_iter()
            .map(|(user, builder)| (user, builder.build()))
            .filter(|(_, record)| !record.is_empty())
            .collect();
        (activity, self.statistics)
    }
}
