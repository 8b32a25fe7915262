//! Driving port for pull request reads.

use async_trait::async_trait;

use crate::domain::{Error, PullRequest, PullRequestId, PullRequestSummary, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestQuery: Send + Sync {
    /// Fetch a pull request by identifier.
    async fn get_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, Error>;

    /// Pull requests on which `reviewer` is currently assigned.
    ///
    /// Unknown users simply have no reviews.
    async fn reviews_for(&self, reviewer: &UserId) -> Result<Vec<PullRequestSummary>, Error>;
}
