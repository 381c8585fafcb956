//! Repository for the `tag_owners` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag_owner::{CreateTagOwner, TagOwner, UpdateTagOwner};

const COLUMNS: &str = "t.id, t.stack_id, t.tag, t.owners, t.created_at, t.updated_at";

/// Provides CRUD operations for tag owner entries.
pub struct TagOwnerRepo;

impl TagOwnerRepo {
    /// Insert a new tag owner entry in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateTagOwner,
    ) -> Result<TagOwner, sqlx::Error> {
        let query = format!(
            "INSERT INTO tag_owners AS t (stack_id, tag, owners) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TagOwner>(&query)
            .bind(stack_id)
            .bind(&input.tag)
            .bind(&input.owners)
            .fetch_one(pool)
            .await
    }

    /// Find a tag owner entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TagOwner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tag_owners t WHERE t.id = $1");
        sqlx::query_as::<_, TagOwner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the tag owner entries of one stack, ordered by tag.
    pub async fn list_for_stack(
        pool: &PgPool,
        stack_id: DbId,
    ) -> Result<Vec<TagOwner>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tag_owners t WHERE t.stack_id = $1 ORDER BY t.tag ASC");
        sqlx::query_as::<_, TagOwner>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List tag owner entries across all stacks in (stack priority, stack
    /// name, tag) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TagOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tag_owners t \
             JOIN stacks s ON s.id = t.stack_id \
             ORDER BY s.priority ASC, s.name ASC, t.tag ASC"
        );
        sqlx::query_as::<_, TagOwner>(&query).fetch_all(pool).await
    }

    /// Update a tag's owners. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTagOwner,
    ) -> Result<Option<TagOwner>, sqlx::Error> {
        let query = format!(
            "UPDATE tag_owners AS t SET \
                owners = COALESCE($2, owners), \
                updated_at = NOW() \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TagOwner>(&query)
            .bind(id)
            .bind(&input.owners)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag owner entry by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tag_owners WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
