//! Repository for the `policy_versions` ledger table.
//!
//! The ledger is append-only: rows are created as `pending` and updated
//! exactly once to record the push outcome. Nothing here deletes rows.

use aclstack_core::policy::PushStatus;
use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::policy_version::{NewPolicyVersion, PolicyVersion};

const COLUMNS: &str = "id, version_number, rendered_policy, remote_tag, \
     push_status, push_error, created_at, pushed_at";

/// Provides append/read operations for the policy version ledger.
pub struct PolicyVersionRepo;

impl PolicyVersionRepo {
    /// Append a new pending version, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewPolicyVersion,
    ) -> Result<PolicyVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO policy_versions (version_number, rendered_policy) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PolicyVersion>(&query)
            .bind(input.version_number)
            .bind(&input.rendered_policy)
            .fetch_one(pool)
            .await
    }

    /// Find a version by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PolicyVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM policy_versions WHERE id = $1");
        sqlx::query_as::<_, PolicyVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The most recently numbered version, if any.
    pub async fn latest(pool: &PgPool) -> Result<Option<PolicyVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM policy_versions \
             ORDER BY version_number DESC LIMIT 1"
        );
        sqlx::query_as::<_, PolicyVersion>(&query)
            .fetch_optional(pool)
            .await
    }

    /// List versions, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PolicyVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM policy_versions \
             ORDER BY version_number DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, PolicyVersion>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record a successful push: status, remote tag, and push time.
    pub async fn record_success(
        pool: &PgPool,
        id: DbId,
        remote_tag: &str,
    ) -> Result<Option<PolicyVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE policy_versions SET \
                push_status = $2, \
                remote_tag = $3, \
                pushed_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PolicyVersion>(&query)
            .bind(id)
            .bind(PushStatus::Success.as_str())
            .bind(remote_tag)
            .fetch_optional(pool)
            .await
    }

    /// Record a failed push: status, error text, and push time.
    pub async fn record_failure(
        pool: &PgPool,
        id: DbId,
        error: &str,
    ) -> Result<Option<PolicyVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE policy_versions SET \
                push_status = $2, \
                push_error = $3, \
                pushed_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PolicyVersion>(&query)
            .bind(id)
            .bind(PushStatus::Failed.as_str())
            .bind(error)
            .fetch_optional(pool)
            .await
    }
}
