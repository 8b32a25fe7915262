//! Outbound adapters implementing the domain's driven ports.
//!
//! - **memory**: process-local directory and pull request store
//! - **persistence**: PostgreSQL-backed adapters using Diesel
//!
//! Both sets of adapters are thin translators and carry no assignment rules.

pub mod memory;
pub mod persistence;
