//! PostgreSQL-backed pull request store.
//!
//! Mutations are single conditional statements, so the database row lock is
//! the compare-and-swap. When a guarded update matches nothing the record is
//! re-read to report why.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Text, Timestamptz};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    PullRequestStatistics, PullRequestStore, PullRequestStoreError, StatisticsSourceError,
};
use crate::domain::{
    PullRequest, PullRequestCounts, PullRequestId, PullRequestSummary, ReviewerLoad, UserId,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    NewPullRequestRow, PullRequestCountsRow, PullRequestRow, PullRequestSummaryRow,
    ReviewerLoadRow, to_count,
};
use super::pool::{DbPool, PoolError};
use super::schema::pull_requests;

const MERGE_SQL: &str = r#"
UPDATE pull_requests
SET status = 'MERGED', merged_at = COALESCE(merged_at, $2)
WHERE pull_request_id = $1
RETURNING pull_request_id, pull_request_name, author_id, status,
          assigned_reviewers, created_at, merged_at
"#;

const REPLACE_REVIEWER_SQL: &str = r#"
UPDATE pull_requests
SET assigned_reviewers = array_replace(assigned_reviewers, $2, $3)
WHERE pull_request_id = $1
  AND status = 'OPEN'
  AND $2 = ANY(assigned_reviewers)
  AND NOT ($3 = ANY(assigned_reviewers))
RETURNING pull_request_id, pull_request_name, author_id, status,
          assigned_reviewers, created_at, merged_at
"#;

const COUNT_PULL_REQUESTS_SQL: &str = r#"
SELECT COUNT(*) AS total,
       COUNT(*) FILTER (WHERE status = 'OPEN') AS open,
       COUNT(*) FILTER (WHERE status = 'MERGED') AS merged
FROM pull_requests
"#;

const REVIEWER_LOADS_SQL: &str = r#"
SELECT reviewer AS user_id, COUNT(*) AS assigned
FROM pull_requests, unnest(assigned_reviewers) AS reviewer
GROUP BY reviewer
ORDER BY reviewer COLLATE "C"
"#;

/// Diesel-backed implementation of the pull request store ports.
#[derive(Clone)]
pub struct DieselPullRequestStore {
    pool: DbPool,
}

impl DieselPullRequestStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PullRequestStoreError {
    map_basic_pool_error(error, PullRequestStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PullRequestStoreError {
    map_basic_diesel_error(
        error,
        operation,
        PullRequestStoreError::query,
        PullRequestStoreError::connection,
    )
}

fn map_statistics_pool_error(error: PoolError) -> StatisticsSourceError {
    map_basic_pool_error(error, StatisticsSourceError::connection)
}

fn map_statistics_diesel_error(
    error: diesel::result::Error,
    operation: &str,
) -> StatisticsSourceError {
    map_basic_diesel_error(
        error,
        operation,
        StatisticsSourceError::query,
        StatisticsSourceError::connection,
    )
}

fn to_domain(row: Option<PullRequestRow>) -> Result<Option<PullRequest>, PullRequestStoreError> {
    row.map(PullRequest::try_from)
        .transpose()
        .map_err(PullRequestStoreError::query)
}

/// Explain why a guarded reviewer swap matched no row.
///
/// `current` is the record as re-read after the update. A swap that would
/// now succeed means another writer moved the record in between, which is
/// reported as a reviewer conflict.
fn explain_refused_swap(
    id: &PullRequestId,
    current: Option<PullRequest>,
    old: &UserId,
    new: &UserId,
) -> Result<Option<PullRequest>, PullRequestStoreError> {
    let Some(mut current) = current else {
        return Ok(None);
    };
    match current.replace_reviewer(old, new.clone()) {
        Err(error) => Err(PullRequestStoreError::from_swap(id, error)),
        Ok(()) => {
            debug!(pull_request = %id, %old, %new, "reviewer swap raced a concurrent update");
            Err(PullRequestStoreError::reviewer_already_assigned(
                id.as_str(),
                new.as_str(),
            ))
        }
    }
}

#[async_trait]
impl PullRequestStore for DieselPullRequestStore {
    async fn create(&self, pull_request: &PullRequest) -> Result<(), PullRequestStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPullRequestRow::from(pull_request);
        let inserted = diesel::insert_into(pull_requests::table)
            .values(&row)
            .on_conflict(pull_requests::pull_request_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "create pull request"))?;

        if inserted == 0 {
            return Err(PullRequestStoreError::duplicate(pull_request.id().as_str()));
        }
        Ok(())
    }

    async fn find(&self, id: &PullRequestId) -> Result<Option<PullRequest>, PullRequestStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = pull_requests::table
            .find(id.as_str())
            .select(PullRequestRow::as_select())
            .first::<PullRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find pull request"))?;
        to_domain(row)
    }

    async fn merge(
        &self,
        id: &PullRequestId,
        now: DateTime<Utc>,
    ) -> Result<Option<PullRequest>, PullRequestStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = sql_query(MERGE_SQL)
            .bind::<Text, _>(id.as_str())
            .bind::<Timestamptz, _>(now)
            .get_result::<PullRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "merge pull request"))?;
        to_domain(row)
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<Option<PullRequest>, PullRequestStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let swapped = sql_query(REPLACE_REVIEWER_SQL)
            .bind::<Text, _>(id.as_str())
            .bind::<Text, _>(old.as_str())
            .bind::<Text, _>(new.as_str())
            .get_result::<PullRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "replace reviewer"))?;
        if swapped.is_some() {
            return to_domain(swapped);
        }

        debug!(pull_request = %id, %old, %new, "guarded reviewer swap matched no row");
        let current = pull_requests::table
            .find(id.as_str())
            .select(PullRequestRow::as_select())
            .first::<PullRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "re-read pull request"))?;
        explain_refused_swap(id, to_domain(current)?, old, new)
    }

    async fn list_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestSummary>, PullRequestStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = pull_requests::table
            .filter(
                pull_requests::assigned_reviewers.contains(vec![reviewer.as_str().to_owned()]),
            )
            .order((
                pull_requests::created_at.asc(),
                pull_requests::pull_request_id.asc(),
            ))
            .select((
                pull_requests::pull_request_id,
                pull_requests::pull_request_name,
                pull_requests::author_id,
                pull_requests::status,
            ))
            .load::<PullRequestSummaryRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list reviews"))?;

        rows.into_iter()
            .map(PullRequestSummary::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PullRequestStoreError::query)
    }
}

#[async_trait]
impl PullRequestStatistics for DieselPullRequestStore {
    async fn count_pull_requests(&self) -> Result<PullRequestCounts, StatisticsSourceError> {
        let mut conn = self.pool.get().await.map_err(map_statistics_pool_error)?;
        let row = sql_query(COUNT_PULL_REQUESTS_SQL)
            .get_result::<PullRequestCountsRow>(&mut conn)
            .await
            .map_err(|err| map_statistics_diesel_error(err, "count pull requests"))?;
        Ok(PullRequestCounts {
            total: to_count(row.total),
            open: to_count(row.open),
            merged: to_count(row.merged),
        })
    }

    async fn reviewer_loads(&self) -> Result<Vec<ReviewerLoad>, StatisticsSourceError> {
        let mut conn = self.pool.get().await.map_err(map_statistics_pool_error)?;
        let rows = sql_query(REVIEWER_LOADS_SQL)
            .load::<ReviewerLoadRow>(&mut conn)
            .await
            .map_err(|err| map_statistics_diesel_error(err, "reviewer loads"))?;
        rows.into_iter()
            .map(ReviewerLoad::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StatisticsSourceError::query)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the pieces that do not need a live database.

    use super::*;
    use crate::domain::test_support::{
        fixture_timestamp, open_pull_request, pull_request_id, user_id,
    };
    use rstest::rstest;

    #[rstest]
    fn missing_record_after_refused_swap_is_none() {
        let outcome = explain_refused_swap(
            &pull_request_id("pr1"),
            None,
            &user_id("B"),
            &user_id("E"),
        )
        .expect("no error");
        assert!(outcome.is_none());
    }

    #[rstest]
    #[case("B", "C", PullRequestStoreError::reviewer_already_assigned("pr1", "C"))]
    #[case("Z", "E", PullRequestStoreError::reviewer_not_assigned("pr1", "Z"))]
    fn refused_swaps_report_the_reason(
        #[case] old: &str,
        #[case] new: &str,
        #[case] expected: PullRequestStoreError,
    ) {
        let current = open_pull_request("pr1", "A", &["B", "C"]);
        let error = explain_refused_swap(
            &pull_request_id("pr1"),
            Some(current),
            &user_id(old),
            &user_id(new),
        )
        .expect_err("swap refused");
        assert_eq!(error, expected);
    }

    #[rstest]
    fn merged_records_refuse_swaps() {
        let mut current = open_pull_request("pr1", "A", &["B", "C"]);
        current.merge(fixture_timestamp());

        let error = explain_refused_swap(
            &pull_request_id("pr1"),
            Some(current),
            &user_id("B"),
            &user_id("E"),
        )
        .expect_err("merged");
        assert_eq!(error, PullRequestStoreError::merged("pr1"));
    }

    #[rstest]
    fn swaps_that_would_now_succeed_are_reported_as_conflicts() {
        let current = open_pull_request("pr1", "A", &["B", "C"]);
        let error = explain_refused_swap(
            &pull_request_id("pr1"),
            Some(current),
            &user_id("B"),
            &user_id("E"),
        )
        .expect_err("race");
        assert_eq!(
            error,
            PullRequestStoreError::reviewer_already_assigned("pr1", "E")
        );
    }

    #[rstest]
    fn pool_failures_surface_as_connection_errors() {
        assert_eq!(
            map_pool_error(PoolError::checkout("timed out")),
            PullRequestStoreError::connection("timed out")
        );
        assert_eq!(
            map_statistics_pool_error(PoolError::checkout("timed out")),
            StatisticsSourceError::connection("timed out")
        );
    }
}
