//! Read-only counting ports backing review statistics.

use async_trait::async_trait;

use crate::domain::{PullRequestCounts, ReviewerLoad, UserCounts};

use super::define_port_error;

define_port_error! {
    /// Errors raised while counting records.
    pub enum StatisticsSourceError {
        /// Source connection could not be established.
        Connection { message: String } => "statistics source connection failed: {message}",
        /// Counting query failed during execution.
        Query { message: String } => "statistics source query failed: {message}",
    }
}

/// Counts over the directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryStatistics: Send + Sync {
    /// Number of teams.
    async fn count_teams(&self) -> Result<u64, StatisticsSourceError>;

    /// Number of users, and how many are active.
    async fn count_users(&self) -> Result<UserCounts, StatisticsSourceError>;
}

/// Counts over the pull request store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestStatistics: Send + Sync {
    /// Number of pull requests by status.
    async fn count_pull_requests(&self) -> Result<PullRequestCounts, StatisticsSourceError>;

    /// Assignment counts for every user listed as a reviewer at least once,
    /// ordered by user id.
    async fn reviewer_loads(&self) -> Result<Vec<ReviewerLoad>, StatisticsSourceError>;
}
