use std::ops::Add;

/// Item counts seen while collecting one repository, before label filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub merged_prs: u32,
    pub unmerged_prs: u32,
    pub open_issues: u32,
    pub closed_issues: u32,
    /// Items skipped because of a rejection label.
    pub excluded_items: u32,
}

impl RunStatistics {
    pub fn total_prs(&self) -> u64 {
        u64::from(self.merged_prs) + u64::from(self.unmerged_prs)
    }

    pub fn total_issues(&self) -> u64 {
        u64::from(self.open_issues) + u64::from(self.closed_issues)
    }
}

impl Add for RunStatistics {
    type Output = RunStatistics;

    fn add(self, other: RunStatistics) -> RunStatistics {
        RunStatistics {
            merged_prs: self.merged_prs.saturating_add(other.merged_prs),
            unmerged_prs: self.unmerged_prs.saturating_add(other.unmerged_prs),
            open_issues: self.open_issues.saturating_add(other.open_issues),
            closed_issues: self.closed_issues.saturating_add(other.closed_issues),
            excluded_items: self.excluded_items.saturating_add(other.excluded_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_saturate() {
        let full = RunStatistics {
            merged_prs: u32::MAX,
            unmerged_prs: u32::MAX,
            open_issues: 1,
            closed_issues: 2,
            excluded_items: 3,
        };
        let sum = full + full;
        assert_eq!(sum.merged_prs, u32::MAX);
        assert_eq!(sum.open_issues, 2);
        assert_eq!(sum.total_prs(), 2 * u64::from(u32::MAX));
        assert_eq!(sum.total_issues(), 6);
    }
}
