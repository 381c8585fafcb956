//! Policy merge engine and sync orchestration.
//!
//! This crate folds the ACL resources of every stack into one merged
//! [`Policy`](aclstack_core::Policy) document ([`merger::PolicyMerger`]) and
//! coordinates when and how that document is rendered, versioned, and pushed
//! to the remote network-policy service ([`orchestrator::SyncOrchestrator`]):
//! debounced trigger coalescing, blocking trigger-and-wait, forced
//! synchronous pushes, and rollback to a recorded version.
//!
//! The three consumed interfaces — [`store::ResourceStore`],
//! [`ledger::VersionLedger`], and [`client::PolicyClient`] — are traits so
//! that tests can substitute in-memory fakes; the production implementations
//! are backed by Postgres (`aclstack-db`) and HTTP (reqwest).

pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod merger;
pub mod orchestrator;
pub mod store;

pub use client::{HttpPolicyClient, PolicyClient, PolicyClientError};
pub use config::SyncConfig;
pub use error::SyncError;
pub use ledger::{PgVersionLedger, PushOutcome, VersionLedger};
pub use merger::PolicyMerger;
pub use orchestrator::{SyncOrchestrator, SyncResult, SyncStatus};
pub use store::{PgResourceStore, ResourceStore};
