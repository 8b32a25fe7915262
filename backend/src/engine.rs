//! Assembled driving ports over a chosen set of adapters.
//!
//! Callers hold an [`Engine`] and talk to the trait objects it exposes; which
//! adapters sit underneath is decided once, here.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::config::EngineSettings;
use crate::domain::ports::{
    Directory, DirectoryStatistics, DirectoryWriter, PullRequestCommand, PullRequestQuery,
    PullRequestStatistics, PullRequestStore, StatisticsQuery, TeamCommand, TeamQuery,
};
use crate::domain::{PullRequestService, StatisticsService, TeamService};
use crate::outbound::memory::{InMemoryDirectory, InMemoryPullRequestStore};
use crate::outbound::persistence::{DbPool, DieselDirectory, DieselPullRequestStore, PoolError};

/// Failures while wiring an engine.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The database pool could not be built.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Driving ports sharing one directory and one pull request store.
#[derive(Clone)]
pub struct Engine {
    /// Create, merge and reassign.
    pub pull_requests: Arc<dyn PullRequestCommand>,
    /// Pull request lookups and review listings.
    pub pull_request_queries: Arc<dyn PullRequestQuery>,
    /// Team creation and member activity toggles.
    pub teams: Arc<dyn TeamCommand>,
    /// Team lookups by name.
    pub team_queries: Arc<dyn TeamQuery>,
    /// Aggregate counts and reviewer loads.
    pub statistics: Arc<dyn StatisticsQuery>,
}

impl Engine {
    /// Wire services over process-local adapters.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::assemble(
            Arc::new(InMemoryDirectory::new()),
            Arc::new(InMemoryPullRequestStore::new()),
            clock,
        )
    }

    /// Wire services over PostgreSQL when `settings` name a database.
    ///
    /// Falls back to [`Engine::in_memory`] when no database URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Pool`] when the pool cannot be built.
    pub async fn connect(
        settings: &EngineSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BootstrapError> {
        let Some(config) = settings.pool_config() else {
            info!("no database configured; using in-memory adapters");
            return Ok(Self::in_memory(clock));
        };

        let pool = DbPool::new(config).await?;
        info!("database pool ready");
        Ok(Self::assemble(
            Arc::new(DieselDirectory::new(pool.clone())),
            Arc::new(DieselPullRequestStore::new(pool)),
            clock,
        ))
    }

    fn assemble<D, S>(directory: Arc<D>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        D: Directory + DirectoryWriter + DirectoryStatistics + 'static,
        S: PullRequestStore + PullRequestStatistics + 'static,
    {
        let pull_requests = Arc::new(PullRequestService::new(
            Arc::clone(&directory),
            Arc::clone(&store),
            clock,
        ));
        let teams = Arc::new(TeamService::new(Arc::clone(&directory)));
        let statistics = Arc::new(StatisticsService::new(directory, store));

        Self {
            pull_requests: pull_requests.clone(),
            pull_request_queries: pull_requests,
            teams: teams.clone(),
            team_queries: teams,
            statistics,
        }
    }
}
