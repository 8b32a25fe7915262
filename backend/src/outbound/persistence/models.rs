//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-run
//! identifier validation and report failures as plain messages, which the
//! adapters wrap as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use crate::domain::{
    PullRequest, PullRequestId, PullRequestParts, PullRequestStatus, PullRequestSummary,
    ReviewerLoad, TeamMember, TeamName, User, UserId, Username,
};

use super::schema::{pull_requests, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl UserRow {
    pub(crate) fn into_member(self) -> Result<TeamMember, String> {
        Ok(TeamMember::new(
            parse_user_id(self.user_id)?,
            Username::new(self.username).map_err(|err| err.to_string())?,
            self.is_active,
        ))
    }
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let team = TeamName::new(row.team_name.clone()).map_err(|err| err.to_string())?;
        Ok(row.into_member()?.into_user(team))
    }
}

/// Row struct for reading from the pull_requests table.
///
/// Also decodes `RETURNING` rows from raw conditional updates.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PullRequestRow {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl TryFrom<PullRequestRow> for PullRequest {
    type Error = String;

    fn try_from(row: PullRequestRow) -> Result<Self, Self::Error> {
        let reviewers = row
            .assigned_reviewers
            .into_iter()
            .map(parse_user_id)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PullRequest::from_parts(PullRequestParts {
            id: parse_pull_request_id(row.pull_request_id)?,
            name: row.pull_request_name,
            author: parse_user_id(row.author_id)?,
            status: parse_status(&row.status)?,
            reviewers,
            created_at: row.created_at,
            merged_at: row.merged_at,
        }))
    }
}

/// Insertable struct for creating pull request records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_requests)]
pub(crate) struct NewPullRequestRow<'a> {
    pub pull_request_id: &'a str,
    pub pull_request_name: &'a str,
    pub author_id: &'a str,
    pub status: &'a str,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a PullRequest> for NewPullRequestRow<'a> {
    fn from(pull_request: &'a PullRequest) -> Self {
        Self {
            pull_request_id: pull_request.id().as_str(),
            pull_request_name: pull_request.name(),
            author_id: pull_request.author().as_str(),
            status: pull_request.status().as_str(),
            assigned_reviewers: pull_request
                .reviewers()
                .iter()
                .map(|reviewer| reviewer.as_str().to_owned())
                .collect(),
            created_at: pull_request.created_at(),
            merged_at: pull_request.merged_at(),
        }
    }
}

/// Projection used by review listings.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct PullRequestSummaryRow {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

impl TryFrom<PullRequestSummaryRow> for PullRequestSummary {
    type Error = String;

    fn try_from(row: PullRequestSummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_pull_request_id(row.pull_request_id)?,
            name: row.pull_request_name,
            author: parse_user_id(row.author_id)?,
            status: parse_status(&row.status)?,
        })
    }
}

/// Aggregate row for user counts.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct UserCountsRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub active: i64,
}

/// Aggregate row for pull request counts.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct PullRequestCountsRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub open: i64,
    #[diesel(sql_type = BigInt)]
    pub merged: i64,
}

/// Aggregate row for per-reviewer assignment counts.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ReviewerLoadRow {
    #[diesel(sql_type = Text)]
    pub user_id: String,
    #[diesel(sql_type = BigInt)]
    pub assigned: i64,
}

impl TryFrom<ReviewerLoadRow> for ReviewerLoad {
    type Error = String;

    fn try_from(row: ReviewerLoadRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: parse_user_id(row.user_id)?,
            assigned: to_count(row.assigned),
        })
    }
}

/// Convert a SQL count into an unsigned count.
pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

fn parse_user_id(raw: String) -> Result<UserId, String> {
    UserId::new(raw).map_err(|err| err.to_string())
}

fn parse_pull_request_id(raw: String) -> Result<PullRequestId, String> {
    PullRequestId::new(raw).map_err(|err| err.to_string())
}

fn parse_status(raw: &str) -> Result<PullRequestStatus, String> {
    raw.parse().map_err(|err: crate::domain::ParsePullRequestStatusError| err.to_string())
}
