//! Repository for the `acl_rules` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::acl_rule::{AclRule, CreateAclRule, UpdateAclRule};

const COLUMNS: &str = "r.id, r.stack_id, r.rule_order, r.action, r.protocol, \
     r.sources, r.destinations, r.created_at, r.updated_at";

/// Provides CRUD operations for ACL rules.
pub struct AclRuleRepo;

impl AclRuleRepo {
    /// Insert a new ACL rule in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateAclRule,
    ) -> Result<AclRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO acl_rules AS r \
                (stack_id, rule_order, action, protocol, sources, destinations) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AclRule>(&query)
            .bind(stack_id)
            .bind(input.rule_order)
            .bind(&input.action)
            .bind(&input.protocol)
            .bind(&input.sources)
            .bind(&input.destinations)
            .fetch_one(pool)
            .await
    }

    /// Find an ACL rule by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AclRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM acl_rules r WHERE r.id = $1");
        sqlx::query_as::<_, AclRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the ACL rules of one stack, ordered by rule order.
    pub async fn list_for_stack(
        pool: &PgPool,
        stack_id: DbId,
    ) -> Result<Vec<AclRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM acl_rules r \
             WHERE r.stack_id = $1 ORDER BY r.rule_order ASC, r.id ASC"
        );
        sqlx::query_as::<_, AclRule>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List ACL rules across all stacks in (stack priority, stack name,
    /// rule order) order — the exact concatenation order of the merged
    /// document.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AclRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM acl_rules r \
             JOIN stacks s ON s.id = r.stack_id \
             ORDER BY s.priority ASC, s.name ASC, r.rule_order ASC, r.id ASC"
        );
        sqlx::query_as::<_, AclRule>(&query).fetch_all(pool).await
    }

    /// Update an ACL rule. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAclRule,
    ) -> Result<Option<AclRule>, sqlx::Error> {
        let query = format!(
            "UPDATE acl_rules AS r SET \
                rule_order = COALESCE($2, rule_order), \
                action = COALESCE($3, action), \
                protocol = COALESCE($4, protocol), \
                sources = COALESCE($5, sources), \
                destinations = COALESCE($6, destinations), \
                updated_at = NOW() \
             WHERE r.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AclRule>(&query)
            .bind(id)
            .bind(input.rule_order)
            .bind(&input.action)
            .bind(&input.protocol)
            .bind(&input.sources)
            .bind(&input.destinations)
            .fetch_optional(pool)
            .await
    }

    /// Delete an ACL rule by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM acl_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
