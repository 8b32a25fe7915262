//! Driving port for team and membership changes.

use async_trait::async_trait;

use crate::domain::{Error, Team, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamCommand: Send + Sync {
    /// Create a team and upsert its members.
    async fn add_team(&self, team: Team) -> Result<Team, Error>;

    /// Toggle whether a user may receive new review assignments.
    ///
    /// Existing reviewer lists are left as they are.
    async fn set_user_active(&self, id: &UserId, active: bool) -> Result<User, Error>;
}
