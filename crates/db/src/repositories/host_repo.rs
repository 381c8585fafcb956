//! Repository for the `hosts` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::host::{CreateHost, Host, UpdateHost};

const COLUMNS: &str = "h.id, h.stack_id, h.name, h.address, h.created_at, h.updated_at";

/// Provides CRUD operations for host aliases.
pub struct HostRepo;

impl HostRepo {
    /// Insert a new host in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateHost,
    ) -> Result<Host, sqlx::Error> {
        let query = format!(
            "INSERT INTO hosts AS h (stack_id, name, address) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Host>(&query)
            .bind(stack_id)
            .bind(&input.name)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    /// Find a host by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Host>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hosts h WHERE h.id = $1");
        sqlx::query_as::<_, Host>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the hosts of one stack, ordered by name.
    pub async fn list_for_stack(pool: &PgPool, stack_id: DbId) -> Result<Vec<Host>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM hosts h WHERE h.stack_id = $1 ORDER BY h.name ASC");
        sqlx::query_as::<_, Host>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List hosts across all stacks in (stack priority, stack name, host
    /// name) order. The first row for a given name is the one that wins the
    /// merge.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Host>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hosts h \
             JOIN stacks s ON s.id = h.stack_id \
             ORDER BY s.priority ASC, s.name ASC, h.name ASC"
        );
        sqlx::query_as::<_, Host>(&query).fetch_all(pool).await
    }

    /// Update a host's address. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHost,
    ) -> Result<Option<Host>, sqlx::Error> {
        let query = format!(
            "UPDATE hosts AS h SET \
                address = COALESCE($2, address), \
                updated_at = NOW() \
             WHERE h.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Host>(&query)
            .bind(id)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Delete a host by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hosts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
