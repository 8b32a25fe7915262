//! Engine configuration loaded via OrthoConfig.
//!
//! Values come from configuration files, `REVIEWER_*` environment variables
//! and command-line flags, in increasing order of precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Settings for wiring an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REVIEWER")]
pub struct EngineSettings {
    /// PostgreSQL URL. In-memory adapters are used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Emit JSON log lines instead of the compact format.
    ///
    /// Unset means JSON. Read it through [`EngineSettings::json_logs()`].
    pub json_logs: Option<bool>,
}

impl EngineSettings {
    /// Log format for [`init_tracing`](crate::telemetry::init_tracing).
    ///
    /// JSON lines unless explicitly disabled.
    pub fn json_logs(&self) -> bool {
        self.json_logs.unwrap_or(true)
    }

    /// Pool limits for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(url);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        if self.pool_min_idle.is_some() {
            config = config.with_min_idle(self.pool_min_idle);
        }
        if let Some(secs) = self.pool_connection_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }
}
