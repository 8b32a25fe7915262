//! Driving port for pull request mutations.
//!
//! Creation assigns initial reviewers, merging closes the pull request, and
//! reassignment swaps one reviewer for an eligible teammate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, PullRequest, PullRequestId, UserId};

/// Request to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    pub id: PullRequestId,
    pub name: String,
    pub author: UserId,
}

/// Request to swap a reviewer out of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignReviewerRequest {
    pub pull_request_id: PullRequestId,
    pub old_reviewer: UserId,
}

/// Result of a successful reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignReviewerResponse {
    pub pull_request: PullRequest,
    pub replaced_by: UserId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestCommand: Send + Sync {
    /// Open a pull request and assign up to two reviewers from the author's
    /// team.
    async fn create_pull_request(
        &self,
        request: CreatePullRequestRequest,
    ) -> Result<PullRequest, Error>;

    /// Merge a pull request. Merging twice returns the first result.
    async fn merge_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, Error>;

    /// Replace a reviewer with the first eligible member of their team.
    async fn reassign_reviewer(
        &self,
        request: ReassignReviewerRequest,
    ) -> Result<ReassignReviewerResponse, Error>;
}
