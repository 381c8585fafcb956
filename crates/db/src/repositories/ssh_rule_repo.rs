//! Repository for the `ssh_rules` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::ssh_rule::{CreateSshRule, SshRule, UpdateSshRule};

const COLUMNS: &str = "r.id, r.stack_id, r.rule_order, r.action, r.sources, \
     r.destinations, r.users, r.check_period, r.created_at, r.updated_at";

/// Provides CRUD operations for SSH rules.
pub struct SshRuleRepo;

impl SshRuleRepo {
    /// Insert a new SSH rule in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateSshRule,
    ) -> Result<SshRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO ssh_rules AS r \
                (stack_id, rule_order, action, sources, destinations, users, check_period) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SshRule>(&query)
            .bind(stack_id)
            .bind(input.rule_order)
            .bind(&input.action)
            .bind(&input.sources)
            .bind(&input.destinations)
            .bind(&input.users)
            .bind(&input.check_period)
            .fetch_one(pool)
            .await
    }

    /// Find an SSH rule by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SshRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ssh_rules r WHERE r.id = $1");
        sqlx::query_as::<_, SshRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the SSH rules of one stack, ordered by rule order.
    pub async fn list_for_stack(
        pool: &PgPool,
        stack_id: DbId,
    ) -> Result<Vec<SshRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ssh_rules r \
             WHERE r.stack_id = $1 ORDER BY r.rule_order ASC, r.id ASC"
        );
        sqlx::query_as::<_, SshRule>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List SSH rules across all stacks in (stack priority, stack name,
    /// rule order) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SshRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ssh_rules r \
             JOIN stacks s ON s.id = r.stack_id \
             ORDER BY s.priority ASC, s.name ASC, r.rule_order ASC, r.id ASC"
        );
        sqlx::query_as::<_, SshRule>(&query).fetch_all(pool).await
    }

    /// Update an SSH rule. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSshRule,
    ) -> Result<Option<SshRule>, sqlx::Error> {
        let query = format!(
            "UPDATE ssh_rules AS r SET \
                rule_order = COALESCE($2, rule_order), \
                action = COALESCE($3, action), \
                sources = COALESCE($4, sources), \
                destinations = COALESCE($5, destinations), \
                users = COALESCE($6, users), \
                check_period = COALESCE($7, check_period), \
                updated_at = NOW() \
             WHERE r.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SshRule>(&query)
            .bind(id)
            .bind(input.rule_order)
            .bind(&input.action)
            .bind(&input.sources)
            .bind(&input.destinations)
            .bind(&input.users)
            .bind(&input.check_period)
            .fetch_optional(pool)
            .await
    }

    /// Delete an SSH rule by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ssh_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
