//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{TeamName, UserId};

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameValidationError {
    /// The username was empty once trimmed.
    #[error("username must not be empty")]
    Empty,
}

/// Human readable name for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, UsernameValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(UsernameValidationError::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the username as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A user as known to the directory.
///
/// ## Invariants
/// - Every user belongs to exactly one team.
/// - `active` reflects the current state. Reviewer lists keep users who were
///   active when placed into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    team: TeamName,
    active: bool,
}

impl User {
    /// Construct a user.
    pub fn new(id: UserId, username: Username, team: TeamName, active: bool) -> Self {
        Self {
            id,
            username,
            team,
            active,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Team the user belongs to.
    pub fn team(&self) -> &TeamName {
        &self.team
    }

    /// Whether the user may receive new review assignments.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Return a copy with the active flag replaced.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
