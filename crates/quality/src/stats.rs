use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockroom_core::lenient::null_as_default;

use crate::issue::{IssueStatus, QualityIssue};

/// Summary cards from `GET /api/order-quality-stats`.
///
/// When the stats endpoint fails the screen computes the same numbers from
/// the issue list with [`QualityStats::from_issues`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolved: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub units_affected: i64,
    /// Issue count per issue type (`damaged`, `wrong_item`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub by_type: BTreeMap<String, u64>,
}

impl QualityStats {
    pub fn from_issues(issues: &[QualityIssue]) -> Self {
        let mut stats = QualityStats::default();
        for issue in issues {
            stats.total += 1;
            match issue.status {
                IssueStatus::Open => stats.open += 1,
                IssueStatus::Resolved => stats.resolved += 1,
            }
            stats.units_affected += issue.quantity_affected.max(0);
            *stats
                .by_type
                .entry(issue.issue_type.as_str().to_string())
                .or_default() += 1;
        }
        stats
    }

    /// Share of issues resolved, `0..=100`. Zero when there are no issues.
    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.resolved as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0)
    }
}
