//! In-process pull request store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    PullRequestStatistics, PullRequestStore, PullRequestStoreError, StatisticsSourceError,
};
use crate::domain::{
    PullRequest, PullRequestCounts, PullRequestId, PullRequestStatus, PullRequestSummary,
    ReviewerLoad, UserId,
};

use super::{POISONED, count};

/// Pull request store held in process memory.
///
/// Each method holds the lock for its whole read-check-write sequence, which
/// makes creation a compare-and-insert and reassignment a compare-and-swap.
#[derive(Debug, Default)]
pub struct InMemoryPullRequestStore {
    records: Mutex<HashMap<PullRequestId, PullRequest>>,
}

impl InMemoryPullRequestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PullRequestId, PullRequest>>, &'static str> {
        self.records.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl PullRequestStore for InMemoryPullRequestStore {
    async fn create(&self, pull_request: &PullRequest) -> Result<(), PullRequestStoreError> {
        let mut records = self.lock().map_err(PullRequestStoreError::connection)?;
        if records.contains_key(pull_request.id()) {
            return Err(PullRequestStoreError::duplicate(pull_request.id().as_str()));
        }
        records.insert(pull_request.id().clone(), pull_request.clone());
        Ok(())
    }

    async fn find(&self, id: &PullRequestId) -> Result<Option<PullRequest>, PullRequestStoreError> {
        let records = self.lock().map_err(PullRequestStoreError::connection)?;
        Ok(records.get(id).cloned())
    }

    async fn merge(
        &self,
        id: &PullRequestId,
        now: DateTime<Utc>,
    ) -> Result<Option<PullRequest>, PullRequestStoreError> {
        let mut records = self.lock().map_err(PullRequestStoreError::connection)?;
        Ok(records.get_mut(id).map(|record| {
            record.merge(now);
            record.clone()
        }))
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<Option<PullRequest>, PullRequestStoreError> {
        let mut records = self.lock().map_err(PullRequestStoreError::connection)?;
        let Some(record) = records.get_mut(id) else {
            return Ok(None);
        };
        record
            .replace_reviewer(old, new.clone())
            .map_err(|error| PullRequestStoreError::from_swap(id, error))?;
        Ok(Some(record.clone()))
    }

    async fn list_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> Result<Vec<PullRequestSummary>, PullRequestStoreError> {
        let records = self.lock().map_err(PullRequestStoreError::connection)?;
        let mut reviewed: Vec<&PullRequest> = records
            .values()
            .filter(|record| record.has_reviewer(reviewer))
            .collect();
        reviewed.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(reviewed.into_iter().map(PullRequest::summary).collect())
    }
}

#[async_trait]
impl PullRequestStatistics for InMemoryPullRequestStore {
    async fn count_pull_requests(&self) -> Result<PullRequestCounts, StatisticsSourceError> {
        let records = self.lock().map_err(StatisticsSourceError::connection)?;
        let open = records
            .values()
            .filter(|record| record.status() == PullRequestStatus::Open)
            .count();
        Ok(PullRequestCounts {
            total: count(records.len()),
            open: count(open),
            merged: count(records.len().saturating_sub(open)),
        })
    }

    async fn reviewer_loads(&self) -> Result<Vec<ReviewerLoad>, StatisticsSourceError> {
        let records = self.lock().map_err(StatisticsSourceError::connection)?;
        let mut loads: BTreeMap<&UserId, u64> = BTreeMap::new();
        for reviewer in records.values().flat_map(PullRequest::reviewers) {
            *loads.entry(reviewer).or_default() += 1;
        }
        Ok(loads
            .into_iter()
            .map(|(user_id, assigned)| ReviewerLoad {
                user_id: user_id.clone(),
                assigned,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Store adapter coverage.

    use super::*;
    use crate::domain::test_support::{
        fixture_timestamp, open_pull_request, pull_request_id, user_id,
    };
    use chrono::Duration;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryPullRequestStore {
        InMemoryPullRequestStore::new()
    }

    async fn seeded(store: &InMemoryPullRequestStore) {
        store
            .create(&open_pull_request("pr1", "A", &["B", "C"]))
            .await
            .expect("seed pull request");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_create_keeps_existing_record(store: InMemoryPullRequestStore) {
        seeded(&store).await;

        let error = store
            .create(&open_pull_request("pr1", "Z", &[]))
            .await
            .expect_err("duplicate id");

        assert_eq!(error, PullRequestStoreError::duplicate("pr1"));
        let stored = store
            .find(&pull_request_id("pr1"))
            .await
            .expect("lookup succeeds")
            .expect("record exists");
        assert_eq!(stored.author(), &user_id("A"));
    }

    #[rstest]
    #[tokio::test]
    async fn merge_is_idempotent(store: InMemoryPullRequestStore) {
        seeded(&store).await;
        let first = fixture_timestamp() + Duration::minutes(5);

        let merged = store
            .merge(&pull_request_id("pr1"), first)
            .await
            .expect("merge succeeds")
            .expect("record exists");
        let again = store
            .merge(&pull_request_id("pr1"), first + Duration::hours(1))
            .await
            .expect("merge succeeds")
            .expect("record exists");

        assert_eq!(merged.merged_at(), Some(first));
        assert_eq!(again, merged);
        assert!(
            store
                .merge(&pull_request_id("missing"), first)
                .await
                .expect("merge succeeds")
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn replace_revalidates_under_the_lock(store: InMemoryPullRequestStore) {
        seeded(&store).await;
        let id = pull_request_id("pr1");

        let updated = store
            .replace_reviewer(&id, &user_id("B"), &user_id("E"))
            .await
            .expect("swap succeeds")
            .expect("record exists");
        assert_eq!(updated.reviewers(), &[user_id("E"), user_id("C")]);

        let stale = store
            .replace_reviewer(&id, &user_id("B"), &user_id("D"))
            .await
            .expect_err("B already replaced");
        assert_eq!(stale, PullRequestStoreError::reviewer_not_assigned("pr1", "B"));

        let duplicate = store
            .replace_reviewer(&id, &user_id("C"), &user_id("E"))
            .await
            .expect_err("E already assigned");
        assert_eq!(
            duplicate,
            PullRequestStoreError::reviewer_already_assigned("pr1", "E")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn replace_on_merged_record_is_refused(store: InMemoryPullRequestStore) {
        seeded(&store).await;
        let id = pull_request_id("pr1");
        store
            .merge(&id, fixture_timestamp())
            .await
            .expect("merge succeeds");

        let error = store
            .replace_reviewer(&id, &user_id("B"), &user_id("E"))
            .await
            .expect_err("merged");

        assert_eq!(error, PullRequestStoreError::merged("pr1"));
    }

    #[rstest]
    #[tokio::test]
    async fn statistics_count_records_and_loads(store: InMemoryPullRequestStore) {
        seeded(&store).await;
        store
            .create(&open_pull_request("pr2", "C", &["B"]))
            .await
            .expect("seed pull request");
        store
            .merge(&pull_request_id("pr2"), fixture_timestamp())
            .await
            .expect("merge succeeds");

        let counts = store.count_pull_requests().await.expect("counts");
        assert_eq!(
            counts,
            PullRequestCounts {
                total: 2,
                open: 1,
                merged: 1
            }
        );

        let loads = store.reviewer_loads().await.expect("loads");
        assert_eq!(
            loads,
            vec![
                ReviewerLoad {
                    user_id: user_id("B"),
                    assigned: 2
                },
                ReviewerLoad {
                    user_id: user_id("C"),
                    assigned: 1
                },
            ]
        );

        let reviews = store
            .list_by_reviewer(&user_id("B"))
            .await
            .expect("listing succeeds");
        let ids: Vec<&str> = reviews.iter().map(|summary| summary.id.as_str()).collect();
        assert_eq!(ids, ["pr1", "pr2"]);
    }
}
