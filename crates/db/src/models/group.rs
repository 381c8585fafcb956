use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `acl_groups` table. Unique per (stack, name); member sets
/// are unioned across stacks at merge time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub stack_id: DbId,
    pub name: String,
    pub members: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a group in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// DTO for updating a group's members.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroup {
    pub members: Option<Vec<String>>,
}
