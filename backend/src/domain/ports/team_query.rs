//! Driving port for team reads.

use async_trait::async_trait;

use crate::domain::{Error, Team, TeamName};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamQuery: Send + Sync {
    /// Fetch a team with its roster in insertion order.
    async fn get_team(&self, name: &TeamName) -> Result<Team, Error>;
}
