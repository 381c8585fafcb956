//! Stack model: an independently-owned set of ACL resources with a merge
//! precedence. Lower `priority` wins conflicts.

use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `stacks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stack {
    pub id: DbId,
    pub name: String,
    pub priority: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStack {
    pub name: String,
    pub priority: i32,
    pub description: Option<String>,
}

/// DTO for updating an existing stack. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStack {
    pub name: Option<String>,
    pub priority: Option<i32>,
    pub description: Option<String>,
}
