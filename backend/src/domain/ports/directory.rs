//! Ports for the user and team directory.
//!
//! The read side answers the two lookups the assignment policies need. The
//! write side is the directory's own path for creating teams and toggling
//! member activity; the policies never call it.

use async_trait::async_trait;

use crate::domain::{Team, TeamName, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by directory read adapters.
    pub enum DirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } => "directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "directory query failed: {message}",
    }
}

define_port_error! {
    /// Errors raised by directory write adapters.
    pub enum DirectoryWriteError {
        /// Directory connection could not be established.
        Connection { message: String } => "directory connection failed: {message}",
        /// Mutation failed during execution.
        Query { message: String } => "directory write failed: {message}",
        /// A team with this name already exists.
        TeamExists { team_name: String } => "team {team_name} already exists",
    }
}

/// Read access to users and team rosters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve a user, or `None` when unknown.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DirectoryError>;

    /// Resolve a team with its roster in insertion order, or `None` when
    /// unknown.
    async fn find_team(&self, name: &TeamName) -> Result<Option<Team>, DirectoryError>;
}

/// Write path owned by the directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryWriter: Send + Sync {
    /// Create `team` and upsert its members atomically.
    ///
    /// Members already belonging to another team move to this one and are
    /// appended to its roster. Fails with
    /// [`DirectoryWriteError::TeamExists`] without touching any member when
    /// the name is taken.
    async fn create_team(&self, team: &Team) -> Result<Team, DirectoryWriteError>;

    /// Set a user's active flag, returning the updated user or `None` when
    /// unknown.
    async fn set_user_active(
        &self,
        id: &UserId,
        active: bool,
    ) -> Result<Option<User>, DirectoryWriteError>;
}
