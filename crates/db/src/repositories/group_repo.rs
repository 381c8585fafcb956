//! Repository for the `acl_groups` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group, UpdateGroup};

const COLUMNS: &str = "g.id, g.stack_id, g.name, g.members, g.created_at, g.updated_at";

/// Provides CRUD operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a new group in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateGroup,
    ) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO acl_groups AS g (stack_id, name, members) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(stack_id)
            .bind(&input.name)
            .bind(&input.members)
            .fetch_one(pool)
            .await
    }

    /// Find a group by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM acl_groups g WHERE g.id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the groups of one stack, ordered by name.
    pub async fn list_for_stack(pool: &PgPool, stack_id: DbId) -> Result<Vec<Group>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM acl_groups g WHERE g.stack_id = $1 ORDER BY g.name ASC");
        sqlx::query_as::<_, Group>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List groups across all stacks in (stack priority, stack name, group
    /// name) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM acl_groups g \
             JOIN stacks s ON s.id = g.stack_id \
             ORDER BY s.priority ASC, s.name ASC, g.name ASC"
        );
        sqlx::query_as::<_, Group>(&query).fetch_all(pool).await
    }

    /// Update a group's members. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE acl_groups AS g SET \
                members = COALESCE($2, members), \
                updated_at = NOW() \
             WHERE g.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(&input.members)
            .fetch_optional(pool)
            .await
    }

    /// Delete a group by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM acl_groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
