use aclstack_core::types::DbId;
use aclstack_core::CoreError;

/// Errors from the sync cycle's infrastructure steps.
///
/// Push failures are deliberately *not* represented here: a rejected or
/// unreachable remote is a normal outcome, recorded in the ledger and
/// reported through a failed
/// [`SyncResult`](crate::orchestrator::SyncResult). Only merge, render, and
/// ledger failures abort a cycle.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Store or ledger access failed.
    #[error(transparent)]
    Store(#[from] CoreError),

    /// The merged policy could not be serialized.
    #[error("Failed to render policy: {0}")]
    Render(#[from] serde_json::Error),

    /// A rollback target's snapshot no longer deserializes.
    #[error("Recorded policy version {version} is not a valid snapshot: {source}")]
    Snapshot {
        version: DbId,
        source: serde_json::Error,
    },

    /// Rollback was asked for a version the ledger does not contain.
    #[error("Policy version not found: {0}")]
    VersionNotFound(DbId),

    /// The sync task stopped before delivering a result (runtime shutdown).
    #[error("Sync was interrupted before a result was delivered")]
    Interrupted,
}
