//! Reviewer assignment and reassignment engine.
//!
//! The [`domain`] module holds the assignment policies, the pull request
//! lifecycle and the services exposed through driving ports. Adapters under
//! [`outbound`] back the driven ports with process memory or PostgreSQL, and
//! [`engine::Engine`] wires one set of adapters behind the services.

pub mod config;
pub mod domain;
pub mod engine;
pub mod outbound;
pub mod telemetry;

pub use config::EngineSettings;
pub use engine::{BootstrapError, Engine};
