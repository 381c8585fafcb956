//! Repository for the `stacks` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::stack::{CreateStack, Stack, UpdateStack};

const COLUMNS: &str = "id, name, priority, description, created_at, updated_at";

/// Provides CRUD operations for stacks.
///
/// Deleting a stack cascades to every resource it owns (enforced by the
/// schema's `ON DELETE CASCADE`).
pub struct StackRepo;

impl StackRepo {
    /// Insert a new stack, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStack) -> Result<Stack, sqlx::Error> {
        let query = format!(
            "INSERT INTO stacks (name, priority, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stack>(&query)
            .bind(&input.name)
            .bind(input.priority)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a stack by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Stack>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stacks WHERE id = $1");
        sqlx::query_as::<_, Stack>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a stack by its globally-unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Stack>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stacks WHERE name = $1");
        sqlx::query_as::<_, Stack>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all stacks ordered by (priority, name).
    pub async fn list(pool: &PgPool) -> Result<Vec<Stack>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stacks ORDER BY priority ASC, name ASC");
        sqlx::query_as::<_, Stack>(&query).fetch_all(pool).await
    }

    /// Update a stack. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStack,
    ) -> Result<Option<Stack>, sqlx::Error> {
        let query = format!(
            "UPDATE stacks SET \
                name = COALESCE($2, name), \
                priority = COALESCE($3, priority), \
                description = COALESCE($4, description), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stack>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.priority)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a stack and (via cascade) all resources it owns.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stacks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
