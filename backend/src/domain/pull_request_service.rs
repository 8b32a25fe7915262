//! Pull request domain services.
//!
//! [`PullRequestService`] implements the pull request driving ports. It
//! resolves identities through the [`Directory`], runs the selection policies,
//! and commits the result to the [`PullRequestStore`] in one atomic call.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CreatePullRequestRequest, Directory, DirectoryError, PullRequestCommand, PullRequestQuery,
    PullRequestStore, PullRequestStoreError, ReassignReviewerRequest, ReassignReviewerResponse,
};
use crate::domain::{
    Error, PullRequest, PullRequestId, PullRequestSummary, Team, TeamName, User, UserId,
    select_initial_reviewers, select_replacement,
};

pub(crate) fn map_directory_error(error: DirectoryError) -> Error {
    match error {
        DirectoryError::Connection { message } => {
            Error::service_unavailable(format!("directory unavailable: {message}"))
        }
        DirectoryError::Query { message } => {
            Error::internal(format!("directory error: {message}"))
        }
    }
}

fn map_store_error(error: PullRequestStoreError) -> Error {
    match error {
        PullRequestStoreError::Connection { message } => {
            Error::service_unavailable(format!("pull request store unavailable: {message}"))
        }
        PullRequestStoreError::Query { message } => {
            Error::internal(format!("pull request store error: {message}"))
        }
        PullRequestStoreError::Duplicate { id } => {
            Error::pull_request_exists(format!("pull request {id} already exists"))
                .with_details(json!({ "pullRequestId": id }))
        }
        PullRequestStoreError::Merged { id } => already_merged(&id),
        PullRequestStoreError::ReviewerNotAssigned { id, reviewer } => {
            reviewer_not_assigned(&id, &reviewer)
        }
        PullRequestStoreError::ReviewerAlreadyAssigned { id, reviewer } => {
            Error::reviewer_conflict(format!(
                "reviewer {reviewer} was assigned to pull request {id} concurrently"
            ))
            .with_details(json!({ "pullRequestId": id, "reviewer": reviewer }))
        }
    }
}

fn pull_request_not_found(id: &PullRequestId) -> Error {
    Error::pull_request_not_found(format!("pull request {id} not found"))
        .with_details(json!({ "pullRequestId": id }))
}

fn already_merged(id: &str) -> Error {
    Error::already_merged(format!("pull request {id} is merged"))
        .with_details(json!({ "pullRequestId": id }))
}

fn reviewer_not_assigned(id: &str, reviewer: &str) -> Error {
    Error::reviewer_not_assigned(format!(
        "reviewer {reviewer} is not assigned to pull request {id}"
    ))
    .with_details(json!({ "pullRequestId": id, "reviewer": reviewer }))
}

pub(crate) fn user_not_found(id: &UserId) -> Error {
    Error::user_not_found(format!("user {id} not found")).with_details(json!({ "userId": id }))
}

pub(crate) fn team_not_found(name: &TeamName) -> Error {
    Error::team_not_found(format!("team {name} not found"))
        .with_details(json!({ "teamName": name }))
}

/// Pull request service implementing the command and query driving ports.
#[derive(Clone)]
pub struct PullRequestService<D, S> {
    directory: Arc<D>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<D, S> PullRequestService<D, S> {
    /// Create a new service over the directory and store.
    pub fn new(directory: Arc<D>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory,
            store,
            clock,
        }
    }
}

impl<D, S> PullRequestService<D, S>
where
    D: Directory,
    S: PullRequestStore,
{
    async fn resolve_user(&self, id: &UserId) -> Result<User, Error> {
        self.directory
            .find_user(id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn resolve_team(&self, name: &TeamName) -> Result<Team, Error> {
        self.directory
            .find_team(name)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| team_not_found(name))
    }

    async fn load(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        self.store
            .find(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| pull_request_not_found(id))
    }
}

#[async_trait]
impl<D, S> PullRequestCommand for PullRequestService<D, S>
where
    D: Directory,
    S: PullRequestStore,
{
    async fn create_pull_request(
        &self,
        request: CreatePullRequestRequest,
    ) -> Result<PullRequest, Error> {
        let CreatePullRequestRequest { id, name, author } = request;
        if name.trim().is_empty() {
            return Err(Error::invalid_request("pull request name must not be empty")
                .with_details(json!({ "field": "name" })));
        }

        let author = self.resolve_user(&author).await?;
        let team = self.resolve_team(author.team()).await?;
        let reviewers = select_initial_reviewers(author.id(), team.members());

        let pull_request =
            PullRequest::open(id, name, author.id().clone(), reviewers, self.clock.utc());
        self.store
            .create(&pull_request)
            .await
            .map_err(map_store_error)?;

        info!(
            pull_request_id = %pull_request.id(),
            author = %pull_request.author(),
            reviewers = ?pull_request.reviewers(),
            "pull request opened"
        );
        Ok(pull_request)
    }

    async fn merge_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        let pull_request = self
            .store
            .merge(id, self.clock.utc())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| pull_request_not_found(id))?;

        info!(
            pull_request_id = %id,
            merged_at = ?pull_request.merged_at(),
            "pull request merged"
        );
        Ok(pull_request)
    }

    async fn reassign_reviewer(
        &self,
        request: ReassignReviewerRequest,
    ) -> Result<ReassignReviewerResponse, Error> {
        let ReassignReviewerRequest {
            pull_request_id,
            old_reviewer,
        } = request;

        let pull_request = self.load(&pull_request_id).await?;
        if !pull_request.is_open() {
            return Err(already_merged(pull_request_id.as_str()));
        }
        if !pull_request.has_reviewer(&old_reviewer) {
            return Err(reviewer_not_assigned(
                pull_request_id.as_str(),
                old_reviewer.as_str(),
            ));
        }

        let outgoing = self.resolve_user(&old_reviewer).await?;
        let team = self.resolve_team(outgoing.team()).await?;
        let Some(candidate) = select_replacement(&pull_request, &old_reviewer, team.members())
        else {
            debug!(
                pull_request_id = %pull_request_id,
                team = %team.name(),
                "no replacement candidate"
            );
            return Err(Error::no_candidate(format!(
                "no active replacement candidate in team {}",
                team.name()
            ))
            .with_details(json!({
                "pullRequestId": pull_request_id,
                "teamName": team.name(),
            })));
        };

        let updated = self
            .store
            .replace_reviewer(&pull_request_id, &old_reviewer, &candidate)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| pull_request_not_found(&pull_request_id))?;

        info!(
            pull_request_id = %pull_request_id,
            old_reviewer = %old_reviewer,
            new_reviewer = %candidate,
            "reviewer reassigned"
        );
        Ok(ReassignReviewerResponse {
            pull_request: updated,
            replaced_by: candidate,
        })
    }
}

#[async_trait]
impl<D, S> PullRequestQuery for PullRequestService<D, S>
where
    D: Directory,
    S: PullRequestStore,
{
    async fn get_pull_request(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        self.load(id).await
    }

    async fn reviews_for(&self, reviewer: &UserId) -> Result<Vec<PullRequestSummary>, Error> {
        self.store
            .list_by_reviewer(reviewer)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "pull_request_service_tests.rs"]
mod tests;
