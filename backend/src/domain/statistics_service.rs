//! Statistics domain service.
//!
//! The four counting queries are independent, so they run concurrently and
//! are joined once. Each branch keeps its own failure; a failing branch
//! never cancels or taints the others.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    DirectoryStatistics, PullRequestStatistics, StatisticsQuery, StatisticsSourceError,
};
use crate::domain::{Error, Statistics, StatisticsBranch, StatisticsError, StatisticsFailure};

fn map_source_error(error: StatisticsSourceError) -> Error {
    match error {
        StatisticsSourceError::Connection { message } => {
            Error::service_unavailable(format!("statistics source unavailable: {message}"))
        }
        StatisticsSourceError::Query { message } => {
            Error::internal(format!("statistics source error: {message}"))
        }
    }
}

fn capture<T>(
    branch: StatisticsBranch,
    result: Result<T, StatisticsSourceError>,
    failures: &mut Vec<StatisticsFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(branch = branch.as_str(), %error, "statistics branch failed");
            failures.push(StatisticsFailure {
                branch,
                error: map_source_error(error),
            });
            None
        }
    }
}

/// Statistics service implementing [`StatisticsQuery`].
#[derive(Clone)]
pub struct StatisticsService<D, P> {
    directory: Arc<D>,
    pull_requests: Arc<P>,
}

impl<D, P> StatisticsService<D, P> {
    /// Create a new service over the directory and store counters.
    pub fn new(directory: Arc<D>, pull_requests: Arc<P>) -> Self {
        Self {
            directory,
            pull_requests,
        }
    }
}

#[async_trait]
impl<D, P> StatisticsQuery for StatisticsService<D, P>
where
    D: DirectoryStatistics,
    P: PullRequestStatistics,
{
    async fn statistics(&self) -> Result<Statistics, StatisticsError> {
        let (teams, users, pull_requests, reviewer_loads) = tokio::join!(
            self.directory.count_teams(),
            self.directory.count_users(),
            self.pull_requests.count_pull_requests(),
            self.pull_requests.reviewer_loads(),
        );

        let mut failures = Vec::new();
        let teams = capture(StatisticsBranch::Teams, teams, &mut failures);
        let users = capture(StatisticsBranch::Users, users, &mut failures);
        let pull_requests = capture(StatisticsBranch::PullRequests, pull_requests, &mut failures);
        let reviewer_loads = capture(
            StatisticsBranch::ReviewerLoads,
            reviewer_loads,
            &mut failures,
        );

        match (teams, users, pull_requests, reviewer_loads) {
            (Some(teams), Some(users), Some(pull_requests), Some(reviewer_loads)) => {
                Ok(Statistics {
                    teams,
                    users,
                    pull_requests,
                    reviewer_loads,
                })
            }
            _ => Err(StatisticsError { failures }),
        }
    }
}
