//! Repository for the `auto_approvers` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::auto_approver::{AutoApprover, CreateAutoApprover, UpdateAutoApprover};

const COLUMNS: &str = "a.id, a.stack_id, a.approver_type, a.match_expr, \
     a.approvers, a.created_at, a.updated_at";

/// Provides CRUD operations for auto-approvers.
pub struct AutoApproverRepo;

impl AutoApproverRepo {
    /// Insert a new auto-approver in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateAutoApprover,
    ) -> Result<AutoApprover, sqlx::Error> {
        let query = format!(
            "INSERT INTO auto_approvers AS a \
                (stack_id, approver_type, match_expr, approvers) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AutoApprover>(&query)
            .bind(stack_id)
            .bind(&input.approver_type)
            .bind(&input.match_expr)
            .bind(&input.approvers)
            .fetch_one(pool)
            .await
    }

    /// Find an auto-approver by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AutoApprover>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM auto_approvers a WHERE a.id = $1");
        sqlx::query_as::<_, AutoApprover>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the auto-approvers of one stack, ordered by (type, match).
    pub async fn list_for_stack(
        pool: &PgPool,
        stack_id: DbId,
    ) -> Result<Vec<AutoApprover>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auto_approvers a \
             WHERE a.stack_id = $1 ORDER BY a.approver_type ASC, a.match_expr ASC"
        );
        sqlx::query_as::<_, AutoApprover>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List auto-approvers across all stacks in (stack priority, stack name,
    /// type, match) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AutoApprover>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auto_approvers a \
             JOIN stacks s ON s.id = a.stack_id \
             ORDER BY s.priority ASC, s.name ASC, a.approver_type ASC, a.match_expr ASC"
        );
        sqlx::query_as::<_, AutoApprover>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update an auto-approver's approver list. Only non-`None` fields are
    /// applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAutoApprover,
    ) -> Result<Option<AutoApprover>, sqlx::Error> {
        let query = format!(
            "UPDATE auto_approvers AS a SET \
                approvers = COALESCE($2, approvers), \
                updated_at = NOW() \
             WHERE a.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AutoApprover>(&query)
            .bind(id)
            .bind(&input.approvers)
            .fetch_optional(pool)
            .await
    }

    /// Delete an auto-approver by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auto_approvers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
