//! Repository for the `grants` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::grant::{CreateGrant, Grant, UpdateGrant};

const COLUMNS: &str = "r.id, r.stack_id, r.rule_order, r.sources, r.destinations, \
     r.ip, r.app, r.created_at, r.updated_at";

/// Provides CRUD operations for grants.
pub struct GrantRepo;

impl GrantRepo {
    /// Insert a new grant in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateGrant,
    ) -> Result<Grant, sqlx::Error> {
        let query = format!(
            "INSERT INTO grants AS r \
                (stack_id, rule_order, sources, destinations, ip, app) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Grant>(&query)
            .bind(stack_id)
            .bind(input.rule_order)
            .bind(&input.sources)
            .bind(&input.destinations)
            .bind(&input.ip)
            .bind(&input.app)
            .fetch_one(pool)
            .await
    }

    /// Find a grant by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Grant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM grants r WHERE r.id = $1");
        sqlx::query_as::<_, Grant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the grants of one stack, ordered by rule order.
    pub async fn list_for_stack(pool: &PgPool, stack_id: DbId) -> Result<Vec<Grant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM grants r \
             WHERE r.stack_id = $1 ORDER BY r.rule_order ASC, r.id ASC"
        );
        sqlx::query_as::<_, Grant>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List grants across all stacks in (stack priority, stack name, rule
    /// order) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Grant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM grants r \
             JOIN stacks s ON s.id = r.stack_id \
             ORDER BY s.priority ASC, s.name ASC, r.rule_order ASC, r.id ASC"
        );
        sqlx::query_as::<_, Grant>(&query).fetch_all(pool).await
    }

    /// Update a grant. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGrant,
    ) -> Result<Option<Grant>, sqlx::Error> {
        let query = format!(
            "UPDATE grants AS r SET \
                rule_order = COALESCE($2, rule_order), \
                sources = COALESCE($3, sources), \
                destinations = COALESCE($4, destinations), \
                ip = COALESCE($5, ip), \
                app = COALESCE($6, app), \
                updated_at = NOW() \
             WHERE r.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Grant>(&query)
            .bind(id)
            .bind(input.rule_order)
            .bind(&input.sources)
            .bind(&input.destinations)
            .bind(&input.ip)
            .bind(&input.app)
            .fetch_optional(pool)
            .await
    }

    /// Delete a grant by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM grants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
