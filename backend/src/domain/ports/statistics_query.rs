//! Driving port for review statistics.

use async_trait::async_trait;

use crate::domain::{Statistics, StatisticsError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsQuery: Send + Sync {
    /// Collect every statistic concurrently.
    ///
    /// A failing branch never prevents the others from completing; all
    /// failures are reported together.
    async fn statistics(&self) -> Result<Statistics, StatisticsError>;
}
