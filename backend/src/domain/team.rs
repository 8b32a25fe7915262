//! Teams and their ordered rosters.

use serde::{Deserialize, Serialize};

use super::{TeamName, User, UserId, Username};

/// A roster entry as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: UserId,
    pub username: Username,
    pub active: bool,
}

impl TeamMember {
    /// Construct a roster entry.
    pub fn new(id: UserId, username: Username, active: bool) -> Self {
        Self {
            id,
            username,
            active,
        }
    }

    /// Promote the entry to a full user record belonging to `team`.
    pub fn into_user(self, team: TeamName) -> User {
        User::new(self.id, self.username, team, self.active)
    }
}

/// A team together with its roster.
///
/// Roster order is significant: the assignment policies break ties by
/// taking earlier members first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    name: TeamName,
    members: Vec<TeamMember>,
}

impl Team {
    /// Construct a team from its name and ordered roster.
    pub fn new(name: TeamName, members: Vec<TeamMember>) -> Self {
        Self { name, members }
    }

    /// Team name.
    pub fn name(&self) -> &TeamName {
        &self.name
    }

    /// Ordered roster.
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }
}
