use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `postures` table. Unique per (stack, name); the
/// highest-precedence stack's definition wins at merge time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Posture {
    pub id: DbId,
    pub stack_id: DbId,
    pub name: String,
    pub rules: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a posture in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePosture {
    pub name: String,
    pub rules: Vec<String>,
}

/// DTO for updating a posture's rules.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePosture {
    pub rules: Option<Vec<String>>,
}
