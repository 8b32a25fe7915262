//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (directory, store, statistics sources) are implemented by
//! outbound adapters. Driving ports are implemented by the domain services
//! and consumed by whatever fronts the engine.

mod macros;
pub(crate) use macros::define_port_error;

mod directory;
mod pull_request_command;
mod pull_request_query;
mod pull_request_store;
mod statistics_query;
mod statistics_source;
mod team_command;
mod team_query;

#[cfg(test)]
pub use directory::{MockDirectory, MockDirectoryWriter};
pub use directory::{Directory, DirectoryError, DirectoryWriteError, DirectoryWriter};
#[cfg(test)]
pub use pull_request_command::MockPullRequestCommand;
pub use pull_request_command::{
    CreatePullRequestRequest, PullRequestCommand, ReassignReviewerRequest,
    ReassignReviewerResponse,
};
#[cfg(test)]
pub use pull_request_query::MockPullRequestQuery;
pub use pull_request_query::PullRequestQuery;
#[cfg(test)]
pub use pull_request_store::MockPullRequestStore;
pub use pull_request_store::{PullRequestStore, PullRequestStoreError};
#[cfg(test)]
pub use statistics_query::MockStatisticsQuery;
pub use statistics_query::StatisticsQuery;
#[cfg(test)]
pub use statistics_source::{MockDirectoryStatistics, MockPullRequestStatistics};
pub use statistics_source::{DirectoryStatistics, PullRequestStatistics, StatisticsSourceError};
#[cfg(test)]
pub use team_command::MockTeamCommand;
pub use team_command::TeamCommand;
#[cfg(test)]
pub use team_query::MockTeamQuery;
pub use team_query::TeamQuery;
