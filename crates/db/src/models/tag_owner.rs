use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tag_owners` table. Unique per (stack, tag); owner sets
/// are unioned across stacks at merge time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagOwner {
    pub id: DbId,
    pub stack_id: DbId,
    pub tag: String,
    pub owners: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a tag owner entry in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagOwner {
    pub tag: String,
    pub owners: Vec<String>,
}

/// DTO for updating a tag's owners.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTagOwner {
    pub owners: Option<Vec<String>>,
}
