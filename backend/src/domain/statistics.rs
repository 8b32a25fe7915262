//! Review load statistics.

use serde::{Deserialize, Serialize};

use super::{Error, UserId};

/// Total and active user counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCounts {
    pub total: u64,
    pub active: u64,
}

/// Pull request counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestCounts {
    pub total: u64,
    pub open: u64,
    pub merged: u64,
}

/// Number of pull requests listing a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerLoad {
    pub user_id: UserId,
    pub assigned: u64,
}

/// Aggregate statistics across the directory and the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub teams: u64,
    pub users: UserCounts,
    pub pull_requests: PullRequestCounts,
    pub reviewer_loads: Vec<ReviewerLoad>,
}

/// Independent queries making up [`Statistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsBranch {
    Teams,
    Users,
    PullRequests,
    ReviewerLoads,
}

impl StatisticsBranch {
    /// Stable label used in logs and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teams => "teams",
            Self::Users => "users",
            Self::PullRequests => "pull_requests",
            Self::ReviewerLoads => "reviewer_loads",
        }
    }
}

/// Failure of one statistics branch.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsFailure {
    pub branch: StatisticsBranch,
    pub error: Error,
}

/// Every branch that failed while collecting statistics.
///
/// Branches that succeeded are not reported; they ran to completion
/// regardless of the failures listed here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("statistics collection failed: {}", describe(.failures))]
pub struct StatisticsError {
    pub failures: Vec<StatisticsFailure>,
}

fn describe(failures: &[StatisticsFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("{}: {}", failure.branch.as_str(), failure.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    //! Failure reporting coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn error_message_names_every_failed_branch() {
        let error = StatisticsError {
            failures: vec![
                StatisticsFailure {
                    branch: StatisticsBranch::Users,
                    error: Error::service_unavailable("directory down"),
                },
                StatisticsFailure {
                    branch: StatisticsBranch::ReviewerLoads,
                    error: Error::internal("bad row"),
                },
            ],
        };

        assert_eq!(
            error.to_string(),
            "statistics collection failed: users: directory down; reviewer_loads: bad row"
        );
    }

    #[rstest]
    #[case(StatisticsBranch::Teams, "teams")]
    #[case(StatisticsBranch::PullRequests, "pull_requests")]
    fn branch_labels_match_serde_names(#[case] branch: StatisticsBranch, #[case] label: &str) {
        assert_eq!(branch.as_str(), label);
        assert_eq!(
            serde_json::to_value(branch).expect("serialise branch"),
            serde_json::json!(label)
        );
    }
}
