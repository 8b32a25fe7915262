//! PostgreSQL persistence adapters using Diesel.
//!
//! The adapters translate between Diesel rows and domain types and nothing
//! more; assignment rules stay in the domain. Row structs (`models.rs`) and
//! table definitions (`schema.rs`) never leave this module.
//!
//! Every atomic operation the ports promise maps onto a single statement or a
//! single transaction:
//!
//! - team creation claims the team row with `ON CONFLICT DO NOTHING` before
//!   upserting members, all inside one transaction;
//! - pull request creation is an insert that does nothing on conflict;
//! - merge and reviewer replacement are guarded `UPDATE ... RETURNING`
//!   statements.
//!
//! ```ignore
//! use reviewer_engine::outbound::persistence::{DbPool, DieselDirectory, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/reviews")).await?;
//! let directory = DieselDirectory::new(pool.clone());
//! ```

mod diesel_directory;
mod diesel_error_mapping;
mod diesel_pull_request_store;
mod models;
mod pool;
mod schema;

pub use diesel_directory::DieselDirectory;
pub use diesel_pull_request_store::DieselPullRequestStore;
pub use pool::{DbPool, PoolConfig, PoolError};
