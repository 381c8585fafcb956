//! Repository for the `postures` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::posture::{CreatePosture, Posture, UpdatePosture};

const COLUMNS: &str = "p.id, p.stack_id, p.name, p.rules, p.created_at, p.updated_at";

/// Provides CRUD operations for postures.
pub struct PostureRepo;

impl PostureRepo {
    /// Insert a new posture in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreatePosture,
    ) -> Result<Posture, sqlx::Error> {
        let query = format!(
            "INSERT INTO postures AS p (stack_id, name, rules) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Posture>(&query)
            .bind(stack_id)
            .bind(&input.name)
            .bind(&input.rules)
            .fetch_one(pool)
            .await
    }

    /// Find a posture by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Posture>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM postures p WHERE p.id = $1");
        sqlx::query_as::<_, Posture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the postures of one stack, ordered by name.
    pub async fn list_for_stack(
        pool: &PgPool,
        stack_id: DbId,
    ) -> Result<Vec<Posture>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM postures p WHERE p.stack_id = $1 ORDER BY p.name ASC");
        sqlx::query_as::<_, Posture>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List postures across all stacks in (stack priority, stack name,
    /// posture name) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Posture>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM postures p \
             JOIN stacks s ON s.id = p.stack_id \
             ORDER BY s.priority ASC, s.name ASC, p.name ASC"
        );
        sqlx::query_as::<_, Posture>(&query).fetch_all(pool).await
    }

    /// Update a posture's rules. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePosture,
    ) -> Result<Option<Posture>, sqlx::Error> {
        let query = format!(
            "UPDATE postures AS p SET \
                rules = COALESCE($2, rules), \
                updated_at = NOW() \
             WHERE p.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Posture>(&query)
            .bind(id)
            .bind(&input.rules)
            .fetch_optional(pool)
            .await
    }

    /// Delete a posture by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM postures WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
