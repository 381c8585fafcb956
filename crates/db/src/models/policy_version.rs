//! Policy version ledger model: an append-only audit record of one
//! render+push attempt.

use aclstack_core::policy::PushStatus;
use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `policy_versions` table.
///
/// Rows are never deleted. Each row is mutated exactly once, to transition
/// `push_status` out of `pending` and set `pushed_at` plus `remote_tag` or
/// `push_error`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PolicyVersion {
    pub id: DbId,
    /// Monotonic, starts at 1, strictly increases with creation order.
    pub version_number: i64,
    /// The serialized policy document exactly as it was pushed.
    pub rendered_policy: String,
    /// Entity tag returned by the remote service on a successful push.
    pub remote_tag: Option<String>,
    /// One of `pending`, `success`, `failed`.
    pub push_status: String,
    pub push_error: Option<String>,
    pub created_at: Timestamp,
    pub pushed_at: Option<Timestamp>,
}

impl PolicyVersion {
    /// The row's `push_status` as a typed enum, if it is a known value.
    pub fn status(&self) -> Option<PushStatus> {
        PushStatus::parse(&self.push_status)
    }
}

/// DTO for appending a new (pending) version to the ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPolicyVersion {
    pub version_number: i64,
    pub rendered_policy: String,
}
