//! Domain primitives, policies, and services.
//!
//! Purpose: define the reviewer assignment model and the rules that govern
//! it. Keep types free of persistence and transport concerns and document
//! invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Identifiers: [`UserId`], [`TeamName`], [`PullRequestId`].
//! - Entities: [`User`], [`Team`], [`TeamMember`], [`PullRequest`].
//! - Policies: [`select_initial_reviewers`], [`select_replacement`].
//! - Services: [`PullRequestService`], [`TeamService`], [`StatisticsService`].
//! - Errors: [`Error`] with its stable [`ErrorCode`].

pub mod assignment;
pub mod error;
pub mod identifiers;
pub mod ports;
pub mod pull_request;
pub mod pull_request_service;
pub mod statistics;
pub mod statistics_service;
pub mod team;
pub mod team_service;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::assignment::{MAX_INITIAL_REVIEWERS, select_initial_reviewers, select_replacement};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifiers::{IdentifierValidationError, PullRequestId, TeamName, UserId};
pub use self::pull_request::{
    ParsePullRequestStatusError, PullRequest, PullRequestParts, PullRequestStatus,
    PullRequestSummary, ReviewerSwapError,
};
pub use self::pull_request_service::PullRequestService;
pub use self::statistics::{
    PullRequestCounts, ReviewerLoad, Statistics, StatisticsBranch, StatisticsError,
    StatisticsFailure, UserCounts,
};
pub use self::statistics_service::StatisticsService;
pub use self::team::{Team, TeamMember};
pub use self::team_service::TeamService;
pub use self::user::{User, Username, UsernameValidationError};
