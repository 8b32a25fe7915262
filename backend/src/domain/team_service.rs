//! Team domain service.
//!
//! Fronts the directory write path. The assignment policies only ever read
//! the directory, so nothing here touches pull requests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    Directory, DirectoryWriteError, DirectoryWriter, TeamCommand, TeamQuery,
};
use crate::domain::pull_request_service::{map_directory_error, team_not_found, user_not_found};
use crate::domain::{Error, Team, TeamName, User, UserId};

fn map_write_error(error: DirectoryWriteError) -> Error {
    match error {
        DirectoryWriteError::Connection { message } => {
            Error::service_unavailable(format!("directory unavailable: {message}"))
        }
        DirectoryWriteError::Query { message } => {
            Error::internal(format!("directory error: {message}"))
        }
        DirectoryWriteError::TeamExists { team_name } => {
            Error::team_exists(format!("team {team_name} already exists"))
                .with_details(json!({ "teamName": team_name }))
        }
    }
}

/// Team service implementing the team driving ports.
#[derive(Clone)]
pub struct TeamService<D> {
    directory: Arc<D>,
}

impl<D> TeamService<D> {
    /// Create a new service over the directory.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D> TeamCommand for TeamService<D>
where
    D: DirectoryWriter,
{
    async fn add_team(&self, team: Team) -> Result<Team, Error> {
        let created = self
            .directory
            .create_team(&team)
            .await
            .map_err(map_write_error)?;

        info!(
            team = %created.name(),
            members = created.members().len(),
            "team created"
        );
        Ok(created)
    }

    async fn set_user_active(&self, id: &UserId, active: bool) -> Result<User, Error> {
        let updated = self
            .directory
            .set_user_active(id, active)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| user_not_found(id))?;

        info!(user_id = %id, active, "user activity changed");
        Ok(updated)
    }
}

#[async_trait]
impl<D> TeamQuery for TeamService<D>
where
    D: Directory,
{
    async fn get_team(&self, name: &TeamName) -> Result<Team, Error> {
        self.directory
            .find_team(name)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| team_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    //! Team service coverage.

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockDirectory, MockDirectoryWriter};
    use crate::domain::test_support::{team, team_name, user, user_id};
    use rstest::rstest;

    #[tokio::test]
    async fn add_team_returns_stored_roster() {
        let requested = team("infra", &[("A", true), ("B", false)]);
        let stored = requested.clone();

        let mut directory = MockDirectoryWriter::new();
        directory
            .expect_create_team()
            .withf(|candidate| candidate.name().as_str() == "infra")
            .times(1)
            .return_once(move |_| Ok(stored));

        let created = TeamService::new(Arc::new(directory))
            .add_team(requested.clone())
            .await
            .expect("team created");

        assert_eq!(created, requested);
    }

    #[tokio::test]
    async fn add_team_maps_duplicate_name() {
        let mut directory = MockDirectoryWriter::new();
        directory
            .expect_create_team()
            .times(1)
            .return_once(|_| Err(DirectoryWriteError::team_exists("infra")));

        let error = TeamService::new(Arc::new(directory))
            .add_team(team("infra", &[]))
            .await
            .expect_err("duplicate team");

        assert_eq!(error.code(), ErrorCode::TeamExists);
        assert_eq!(error.code().as_str(), "TEAM_EXISTS");
    }

    #[rstest]
    #[case(Some(user("A", "infra", false)), None)]
    #[case(None, Some(ErrorCode::UserNotFound))]
    #[tokio::test]
    async fn set_user_active_reports_outcome(
        #[case] stored: Option<User>,
        #[case] expected_error: Option<ErrorCode>,
    ) {
        let mut directory = MockDirectoryWriter::new();
        directory
            .expect_set_user_active()
            .withf(|id, active| id.as_str() == "A" && !*active)
            .times(1)
            .return_once(move |_, _| Ok(stored));

        let result = TeamService::new(Arc::new(directory))
            .set_user_active(&user_id("A"), false)
            .await;

        match expected_error {
            None => assert!(!result.expect("user updated").is_active()),
            Some(code) => assert_eq!(result.expect_err("unknown user").code(), code),
        }
    }

    #[tokio::test]
    async fn get_team_of_unknown_name_is_not_found() {
        let mut directory = MockDirectory::new();
        directory
            .expect_find_team()
            .times(1)
            .return_once(|_| Ok(None));

        let error = TeamService::new(Arc::new(directory))
            .get_team(&team_name("ghosts"))
            .await
            .expect_err("unknown team");

        assert_eq!(error.code(), ErrorCode::TeamNotFound);
    }
}
