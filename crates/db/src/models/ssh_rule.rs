use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ssh_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SshRule {
    pub id: DbId,
    pub stack_id: DbId,
    pub rule_order: i32,
    pub action: String,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub users: Vec<String>,
    pub check_period: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an SSH rule in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSshRule {
    pub rule_order: i32,
    pub action: String,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub users: Vec<String>,
    pub check_period: Option<String>,
}

/// DTO for updating an SSH rule. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSshRule {
    pub rule_order: Option<i32>,
    pub action: Option<String>,
    pub sources: Option<Vec<String>>,
    pub destinations: Option<Vec<String>>,
    pub users: Option<Vec<String>>,
    pub check_period: Option<String>,
}
