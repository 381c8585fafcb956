//! Repository for the `acl_tests` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::acl_test::{AclTest, CreateAclTest, UpdateAclTest};

const COLUMNS: &str = "t.id, t.stack_id, t.rule_order, t.source, t.accept, \
     t.deny, t.created_at, t.updated_at";

/// Provides CRUD operations for ACL tests.
pub struct AclTestRepo;

impl AclTestRepo {
    /// Insert a new ACL test in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateAclTest,
    ) -> Result<AclTest, sqlx::Error> {
        let query = format!(
            "INSERT INTO acl_tests AS t \
                (stack_id, rule_order, source, accept, deny) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AclTest>(&query)
            .bind(stack_id)
            .bind(input.rule_order)
            .bind(&input.source)
            .bind(&input.accept)
            .bind(&input.deny)
            .fetch_one(pool)
            .await
    }

    /// Find an ACL test by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AclTest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM acl_tests t WHERE t.id = $1");
        sqlx::query_as::<_, AclTest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the ACL tests of one stack, ordered by rule order.
    pub async fn list_for_stack(
        pool: &PgPool,
        stack_id: DbId,
    ) -> Result<Vec<AclTest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM acl_tests t \
             WHERE t.stack_id = $1 ORDER BY t.rule_order ASC, t.id ASC"
        );
        sqlx::query_as::<_, AclTest>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List ACL tests across all stacks in (stack priority, stack name,
    /// test order) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AclTest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM acl_tests t \
             JOIN stacks s ON s.id = t.stack_id \
             ORDER BY s.priority ASC, s.name ASC, t.rule_order ASC, t.id ASC"
        );
        sqlx::query_as::<_, AclTest>(&query).fetch_all(pool).await
    }

    /// Update an ACL test. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAclTest,
    ) -> Result<Option<AclTest>, sqlx::Error> {
        let query = format!(
            "UPDATE acl_tests AS t SET \
                rule_order = COALESCE($2, rule_order), \
                source = COALESCE($3, source), \
                accept = COALESCE($4, accept), \
                deny = COALESCE($5, deny), \
                updated_at = NOW() \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AclTest>(&query)
            .bind(id)
            .bind(input.rule_order)
            .bind(&input.source)
            .bind(&input.accept)
            .bind(&input.deny)
            .fetch_optional(pool)
            .await
    }

    /// Delete an ACL test by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM acl_tests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
