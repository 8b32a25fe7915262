//! Port for pull request persistence with atomic updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PullRequest, PullRequestId, PullRequestSummary, ReviewerSwapError, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pull request store adapters.
    pub enum PullRequestStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "pull request store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pull request store query failed: {message}",
        /// A pull request with this identifier already exists.
        Duplicate { id: String } => "pull request {id} already exists",
        /// The pull request is merged, so its reviewers are frozen.
        Merged { id: String } => "pull request {id} is merged",
        /// The outgoing reviewer is no longer assigned.
        ReviewerNotAssigned { id: String, reviewer: String } =>
            "reviewer {reviewer} is not assigned to pull request {id}",
        /// The incoming reviewer is already assigned.
        ReviewerAlreadyAssigned { id: String, reviewer: String } =>
            "reviewer {reviewer} is already assigned to pull request {id}",
    }
}

impl PullRequestStoreError {
    /// Translate a refused in-record reviewer swap for pull request `id`.
    pub fn from_swap(id: &PullRequestId, error: ReviewerSwapError) -> Self {
        match error {
            ReviewerSwapError::Merged => Self::merged(id.as_str()),
            ReviewerSwapError::NotAssigned(reviewer) => {
                Self::reviewer_not_assigned(id.as_str(), reviewer)
            }
            ReviewerSwapError::AlreadyAssigned(reviewer) => {
                Self::reviewer_already_assigned(id.as_str(), reviewer)
            }
        }
    }
}

/// Pull request records keyed by identifier.
///
/// Every mutation is a single atomic operation. Adapters must never expose a
/// partially applied change.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestStore: Send + Sync {
    /// Insert `pull_request` unless its identifier is taken.
    ///
    /// Fails with [`PullRequestStoreError::Duplicate`] and leaves the
    /// existing record untouched when it is.
    async fn create(&self, pull_request: &PullRequest) -> Result<(), PullRequestStoreError>;

    /// Fetch a pull request by identifier.
    async fn find(&self, id: &PullRequestId) -> Result<Option<PullRequest>, PullRequestStoreError>;

    /// Mark a pull request merged at `now`.
    ///
    /// Idempotent: a merged pull request is returned unchanged. Returns
    /// `None` when the identifier is unknown.
    async fn merge(
        &self,
        id: &PullRequestId,
        now: DateTime<Utc>,
    ) -> Result<Option<PullRequest>, PullRequestStoreError>;

    /// Replace `old` with `new` at the same position.
    ///
    /// The adapter re-checks under its own atomicity that the pull request
    /// is open, `old` is assigned, and `new` is not. Returns `None` when the
    /// identifier is unknown.
    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<Option<PullRequest>, PullRequestStoreError>;

    /// List pull requests reviewed by `reviewer`, oldest first.
    async fn list_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestSummary>, PullRequestStoreError>;
}
