//! Repository for the `ip_sets` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::ip_set::{CreateIpSet, IpSet, UpdateIpSet};

const COLUMNS: &str = "i.id, i.stack_id, i.name, i.addresses, i.created_at, i.updated_at";

/// Provides CRUD operations for IP sets.
pub struct IpSetRepo;

impl IpSetRepo {
    /// Insert a new IP set in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateIpSet,
    ) -> Result<IpSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO ip_sets AS i (stack_id, name, addresses) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IpSet>(&query)
            .bind(stack_id)
            .bind(&input.name)
            .bind(&input.addresses)
            .fetch_one(pool)
            .await
    }

    /// Find an IP set by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IpSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ip_sets i WHERE i.id = $1");
        sqlx::query_as::<_, IpSet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the IP sets of one stack, ordered by name.
    pub async fn list_for_stack(pool: &PgPool, stack_id: DbId) -> Result<Vec<IpSet>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM ip_sets i WHERE i.stack_id = $1 ORDER BY i.name ASC");
        sqlx::query_as::<_, IpSet>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List IP sets across all stacks in (stack priority, stack name, set
    /// name) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<IpSet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ip_sets i \
             JOIN stacks s ON s.id = i.stack_id \
             ORDER BY s.priority ASC, s.name ASC, i.name ASC"
        );
        sqlx::query_as::<_, IpSet>(&query).fetch_all(pool).await
    }

    /// Update an IP set's addresses. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIpSet,
    ) -> Result<Option<IpSet>, sqlx::Error> {
        let query = format!(
            "UPDATE ip_sets AS i SET \
                addresses = COALESCE($2, addresses), \
                updated_at = NOW() \
             WHERE i.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IpSet>(&query)
            .bind(id)
            .bind(&input.addresses)
            .fetch_optional(pool)
            .await
    }

    /// Delete an IP set by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ip_sets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
