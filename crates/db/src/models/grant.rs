use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `grants` table.
///
/// `app` holds the application-capability map as opaque JSON; the merge
/// layer deserializes it into the policy document's typed shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Grant {
    pub id: DbId,
    pub stack_id: DbId,
    pub rule_order: i32,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub ip: Option<Vec<String>>,
    pub app: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a grant in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGrant {
    pub rule_order: i32,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub ip: Option<Vec<String>>,
    pub app: Option<serde_json::Value>,
}

/// DTO for updating a grant. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGrant {
    pub rule_order: Option<i32>,
    pub sources: Option<Vec<String>>,
    pub destinations: Option<Vec<String>>,
    pub ip: Option<Vec<String>>,
    pub app: Option<serde_json::Value>,
}
