//! Embedded PostgreSQL helpers for the Diesel adapter suites.
//!
//! Every test gets its own temporary database on a shared cluster, with the
//! reviewer tables created from `reviewer_schema.sql`.

use std::time::Duration;

use diesel::Connection;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};

const SCHEMA_SQL: &str = include_str!("reviewer_schema.sql");

const CLUSTER_RETRIES: usize = 3;
const PROVISION_RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns true when the `SKIP_TEST_CLUSTER` environment variable is set to a
/// truthy value.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles embedded cluster setup failures consistently.
///
/// When `SKIP_TEST_CLUSTER` is truthy, prints a skip marker and returns `None`.
/// Otherwise panics so a broken cluster fails the run.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// The process-wide embedded cluster, started on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt < CLUSTER_RETRIES => {
                eprintln!(
                    "pg-embed: cluster start attempt {attempt}/{CLUSTER_RETRIES} failed: {error:?}"
                );
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
            Err(error) => return Err(format!("start shared cluster: {error:?}")),
        }
    }
}

/// Create a fresh database on `cluster` and lay out the reviewer tables.
pub fn provision_reviewer_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::new();
    for attempt in 1..=PROVISION_RETRIES {
        match cluster.create_temporary_database() {
            Ok(database) => {
                apply_schema(database.url())?;
                return Ok(database);
            }
            Err(error) => {
                last_error = format!(
                    "create database: attempt {attempt}/{PROVISION_RETRIES}: {error:?}"
                );
            }
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(RETRY_DELAY);
        }
    }
    Err(last_error)
}

fn apply_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.batch_execute(SCHEMA_SQL)
        .map_err(|err| format!("apply schema: {err}"))
}
