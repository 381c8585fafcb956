//! Repository for the `node_attrs` table.

use aclstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::node_attr::{CreateNodeAttr, NodeAttr, UpdateNodeAttr};

const COLUMNS: &str = "n.id, n.stack_id, n.rule_order, n.target, n.attr, \
     n.app, n.created_at, n.updated_at";

/// Provides CRUD operations for node-attribute entries.
pub struct NodeAttrRepo;

impl NodeAttrRepo {
    /// Insert a new node-attribute entry in a stack, returning the created row.
    pub async fn create(
        pool: &PgPool,
        stack_id: DbId,
        input: &CreateNodeAttr,
    ) -> Result<NodeAttr, sqlx::Error> {
        let query = format!(
            "INSERT INTO node_attrs AS n \
                (stack_id, rule_order, target, attr, app) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NodeAttr>(&query)
            .bind(stack_id)
            .bind(input.rule_order)
            .bind(&input.target)
            .bind(&input.attr)
            .bind(&input.app)
            .fetch_one(pool)
            .await
    }

    /// Find a node-attribute entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NodeAttr>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM node_attrs n WHERE n.id = $1");
        sqlx::query_as::<_, NodeAttr>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the node-attribute entries of one stack, ordered by rule order.
    pub async fn list_for_stack(
        pool: &PgPool,
        stack_id: DbId,
    ) -> Result<Vec<NodeAttr>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM node_attrs n \
             WHERE n.stack_id = $1 ORDER BY n.rule_order ASC, n.id ASC"
        );
        sqlx::query_as::<_, NodeAttr>(&query)
            .bind(stack_id)
            .fetch_all(pool)
            .await
    }

    /// List node-attribute entries across all stacks in (stack priority,
    /// stack name, rule order) order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<NodeAttr>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM node_attrs n \
             JOIN stacks s ON s.id = n.stack_id \
             ORDER BY s.priority ASC, s.name ASC, n.rule_order ASC, n.id ASC"
        );
        sqlx::query_as::<_, NodeAttr>(&query).fetch_all(pool).await
    }

    /// Update a node-attribute entry. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNodeAttr,
    ) -> Result<Option<NodeAttr>, sqlx::Error> {
        let query = format!(
            "UPDATE node_attrs AS n SET \
                rule_order = COALESCE($2, rule_order), \
                target = COALESCE($3, target), \
                attr = COALESCE($4, attr), \
                app = COALESCE($5, app), \
                updated_at = NOW() \
             WHERE n.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NodeAttr>(&query)
            .bind(id)
            .bind(input.rule_order)
            .bind(&input.target)
            .bind(&input.attr)
            .bind(&input.app)
            .fetch_optional(pool)
            .await
    }

    /// Delete a node-attribute entry by ID. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM node_attrs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
