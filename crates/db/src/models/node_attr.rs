use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `node_attrs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NodeAttr {
    pub id: DbId,
    pub stack_id: DbId,
    pub rule_order: i32,
    pub target: Vec<String>,
    pub attr: Option<Vec<String>>,
    pub app: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a node-attribute entry in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNodeAttr {
    pub rule_order: i32,
    pub target: Vec<String>,
    pub attr: Option<Vec<String>>,
    pub app: Option<serde_json::Value>,
}

/// DTO for updating a node-attribute entry. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNodeAttr {
    pub rule_order: Option<i32>,
    pub target: Option<Vec<String>>,
    pub attr: Option<Vec<String>>,
    pub app: Option<serde_json::Value>,
}
