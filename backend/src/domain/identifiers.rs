//! Validated identifiers for users, teams, and pull requests.
//!
//! Identifiers are opaque strings chosen by callers. They must be non-empty
//! and carry no surrounding whitespace so that equality checks in the
//! assignment policies never depend on formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned when constructing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierValidationError {
    /// The identifier was empty or only whitespace.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier kind, for example `user id`.
        kind: &'static str,
    },
    /// The identifier had leading or trailing whitespace.
    #[error("{kind} must not contain surrounding whitespace")]
    SurroundingWhitespace {
        /// Identifier kind, for example `user id`.
        kind: &'static str,
    },
}

fn validate(kind: &'static str, raw: &str) -> Result<(), IdentifierValidationError> {
    if raw.trim().is_empty() {
        return Err(IdentifierValidationError::Empty { kind });
    }
    if raw.trim() != raw {
        return Err(IdentifierValidationError::SurroundingWhitespace { kind });
    }
    Ok(())
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(value: impl Into<String>) -> Result<Self, IdentifierValidationError> {
                let raw = value.into();
                validate($kind, &raw)?;
                Ok(Self(raw))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdentifierValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_identifier!(
    /// Stable user identifier.
    ///
    /// # Examples
    /// ```
    /// use reviewer_engine::domain::UserId;
    ///
    /// let id = UserId::new("u1").expect("valid id");
    /// assert_eq!(id.as_str(), "u1");
    /// assert!(UserId::new(" u1").is_err());
    /// ```
    UserId,
    "user id"
);

define_identifier!(
    /// Unique team name, used as the team's key.
    TeamName,
    "team name"
);

define_identifier!(
    /// Pull request identifier, immutable once created.
    PullRequestId,
    "pull request id"
);

#[cfg(test)]
mod tests {
    //! Identifier validation coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_identifiers_are_rejected(#[case] raw: &str) {
        assert_eq!(
            UserId::new(raw),
            Err(IdentifierValidationError::Empty { kind: "user id" })
        );
    }

    #[rstest]
    #[case(" infra")]
    #[case("infra\n")]
    fn padded_identifiers_are_rejected(#[case] raw: &str) {
        assert_eq!(
            TeamName::new(raw),
            Err(IdentifierValidationError::SurroundingWhitespace { kind: "team name" })
        );
    }

    #[rstest]
    fn identifiers_deserialize_through_validation() {
        let id: PullRequestId = serde_json::from_str("\"pr-1001\"").expect("valid id");
        assert_eq!(id.as_str(), "pr-1001");

        let error = serde_json::from_str::<PullRequestId>("\"\"").expect_err("empty id");
        assert!(error.to_string().contains("pull request id must not be empty"));
    }
}
