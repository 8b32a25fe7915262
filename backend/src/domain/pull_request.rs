//! Pull requests and their lifecycle.
//!
//! A pull request moves from [`PullRequestStatus::Open`] to
//! [`PullRequestStatus::Merged`] exactly once. Merging again is a no-op that
//! keeps the original `merged_at`. Reviewer changes are only legal while the
//! pull request is open and always swap one reviewer for another in place.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PullRequestId, UserId};

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    /// Accepting reviewer changes.
    Open,
    /// Closed for good.
    Merged,
}

impl PullRequestStatus {
    /// Canonical upper-case label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pull request status: {0}")]
pub struct ParsePullRequestStatusError(pub String);

impl FromStr for PullRequestStatus {
    type Err = ParsePullRequestStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            other => Err(ParsePullRequestStatusError(other.to_owned())),
        }
    }
}

/// Why an in-place reviewer swap was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewerSwapError {
    /// The pull request is merged.
    #[error("pull request is merged")]
    Merged,
    /// The outgoing reviewer is not assigned.
    #[error("reviewer {0} is not assigned")]
    NotAssigned(UserId),
    /// The incoming reviewer is already assigned.
    #[error("reviewer {0} is already assigned")]
    AlreadyAssigned(UserId),
}

/// Stored fields of a pull request, used by adapters to rebuild records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestParts {
    pub id: PullRequestId,
    pub name: String,
    pub author: UserId,
    pub status: PullRequestStatus,
    pub reviewers: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// A pull request with its assigned reviewers.
///
/// ## Invariants
/// - `reviewers` never contains `author` and never contains duplicates.
/// - `status` never leaves [`PullRequestStatus::Merged`].
/// - `merged_at` is set by the first merge and never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    id: PullRequestId,
    name: String,
    author: UserId,
    status: PullRequestStatus,
    reviewers: Vec<UserId>,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Open a new pull request with the given reviewers.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use reviewer_engine::domain::{PullRequest, PullRequestId, PullRequestStatus, UserId};
    ///
    /// let pr = PullRequest::open(
    ///     PullRequestId::new("pr-1").expect("id"),
    ///     "Add search",
    ///     UserId::new("u1").expect("id"),
    ///     vec![UserId::new("u2").expect("id")],
    ///     Utc::now(),
    /// );
    /// assert_eq!(pr.status(), PullRequestStatus::Open);
    /// assert!(pr.merged_at().is_none());
    /// ```
    pub fn open(
        id: PullRequestId,
        name: impl Into<String>,
        author: UserId,
        reviewers: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            author,
            status: PullRequestStatus::Open,
            reviewers,
            created_at,
            merged_at: None,
        }
    }

    /// Rebuild a pull request from stored fields.
    pub fn from_parts(parts: PullRequestParts) -> Self {
        let PullRequestParts {
            id,
            name,
            author,
            status,
            reviewers,
            created_at,
            merged_at,
        } = parts;
        Self {
            id,
            name,
            author,
            status,
            reviewers,
            created_at,
            merged_at,
        }
    }

    /// Pull request identifier.
    pub fn id(&self) -> &PullRequestId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Author identifier.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Current lifecycle state.
    pub fn status(&self) -> PullRequestStatus {
        self.status
    }

    /// Whether reviewer changes are still permitted.
    pub fn is_open(&self) -> bool {
        self.status == PullRequestStatus::Open
    }

    /// Assigned reviewers in assignment order.
    pub fn reviewers(&self) -> &[UserId] {
        &self.reviewers
    }

    /// Whether `user` is currently a reviewer.
    pub fn has_reviewer(&self, user: &UserId) -> bool {
        self.reviewers.contains(user)
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the first merge, if any.
    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Mark the pull request merged.
    ///
    /// Returns `true` when this call performed the transition. Merging an
    /// already merged pull request leaves it untouched.
    pub fn merge(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == PullRequestStatus::Merged {
            return false;
        }
        self.status = PullRequestStatus::Merged;
        if self.merged_at.is_none() {
            self.merged_at = Some(now);
        }
        true
    }

    /// Replace `old` with `new` at the same position.
    ///
    /// Nothing changes when the swap is refused.
    pub fn replace_reviewer(&mut self, old: &UserId, new: UserId) -> Result<(), ReviewerSwapError> {
        if !self.is_open() {
            return Err(ReviewerSwapError::Merged);
        }
        if self.has_reviewer(&new) {
            return Err(ReviewerSwapError::AlreadyAssigned(new));
        }
        let slot = self
            .reviewers
            .iter_mut()
            .find(|reviewer| *reviewer == old)
            .ok_or_else(|| ReviewerSwapError::NotAssigned(old.clone()))?;
        *slot = new;
        Ok(())
    }

    /// Short projection used by review listings.
    pub fn summary(&self) -> PullRequestSummary {
        PullRequestSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            author: self.author.clone(),
            status: self.status,
        }
    }
}

/// Short form of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSummary {
    pub id: PullRequestId,
    pub name: String,
    pub author: UserId,
    pub status: PullRequestStatus,
}
