//! Domain-level error types.
//!
//! These errors are transport agnostic. Callers map them onto whatever
//! envelope their protocol uses; [`ErrorCode::as_str`] provides the stable
//! machine-readable tag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The pull request does not exist.
    PullRequestNotFound,
    /// The user does not exist.
    UserNotFound,
    /// The team does not exist.
    TeamNotFound,
    /// A pull request with the same identifier already exists.
    PullRequestExists,
    /// A team with the same name already exists.
    TeamExists,
    /// The pull request is merged and can no longer change reviewers.
    AlreadyMerged,
    /// The user is not among the pull request's reviewers.
    ReviewerNotAssigned,
    /// No active team member is eligible as a replacement reviewer.
    NoCandidate,
    /// The chosen replacement was assigned by a concurrent update.
    ReviewerConflict,
    /// A collaborator could not be reached.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain or a collaborator.
    InternalError,
}

impl ErrorCode {
    /// Screaming-case tag exposed to callers.
    ///
    /// Absent resources share the `NOT_FOUND` tag; [`ErrorCode`] itself keeps
    /// them apart.
    ///
    /// # Examples
    /// ```
    /// use reviewer_engine::domain::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::NoCandidate.as_str(), "NO_CANDIDATE");
    /// assert_eq!(ErrorCode::TeamNotFound.as_str(), "NOT_FOUND");
    /// ```
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::PullRequestNotFound | Self::UserNotFound | Self::TeamNotFound => "NOT_FOUND",
            Self::PullRequestExists => "PR_EXISTS",
            Self::TeamExists => "TEAM_EXISTS",
            Self::AlreadyMerged => "PR_MERGED",
            Self::ReviewerNotAssigned => "NOT_ASSIGNED",
            Self::NoCandidate => "NO_CANDIDATE",
            Self::ReviewerConflict => "CONFLICT",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether the code names an absent resource.
    pub const fn is_not_found(self) -> bool {
        matches!(
            self,
            Self::PullRequestNotFound | Self::UserNotFound | Self::TeamNotFound
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use reviewer_engine::domain::{Error, ErrorCode};
///
/// let err = Error::no_candidate("no active replacement in team infra");
/// assert_eq!(err.code(), ErrorCode::NoCandidate);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by [`Error::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty or whitespace.
    #[error("error message must not be empty")]
    EmptyMessage,
}

const FALLBACK_MESSAGE: &str = "unspecified error";

impl Error {
    /// Create a new error.
    ///
    /// Blank messages are replaced with a generic placeholder so domain
    /// failures never turn into panics.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: FALLBACK_MESSAGE.to_owned(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use reviewer_engine::domain::{Error, ErrorCode};
    /// use serde_json::json;
    ///
    /// let err = Error::new(ErrorCode::InvalidRequest, "bad")
    ///     .with_details(json!({ "field": "teamName" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::PullRequestNotFound`].
    pub fn pull_request_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PullRequestNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::UserNotFound`].
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::TeamNotFound`].
    pub fn team_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TeamNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::PullRequestExists`].
    pub fn pull_request_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PullRequestExists, message)
    }

    /// Convenience constructor for [`ErrorCode::TeamExists`].
    pub fn team_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TeamExists, message)
    }

    /// Convenience constructor for [`ErrorCode::AlreadyMerged`].
    pub fn already_merged(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyMerged, message)
    }

    /// Convenience constructor for [`ErrorCode::ReviewerNotAssigned`].
    pub fn reviewer_not_assigned(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReviewerNotAssigned, message)
    }

    /// Convenience constructor for [`ErrorCode::NoCandidate`].
    pub fn no_candidate(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoCandidate, message)
    }

    /// Convenience constructor for [`ErrorCode::ReviewerConflict`].
    pub fn reviewer_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReviewerConflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}
