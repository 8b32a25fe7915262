//! In-process adapters for the directory and the pull request store.
//!
//! Used when no database is configured and by behaviour tests. Atomicity
//! comes from holding one mutex for the whole of each port call.

mod directory;
mod pull_request_store;

pub use directory::InMemoryDirectory;
pub use pull_request_store::InMemoryPullRequestStore;

const POISONED: &str = "in-memory state lock poisoned";

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
