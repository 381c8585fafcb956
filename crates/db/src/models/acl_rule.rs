use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `acl_rules` table. `rule_order` is only meaningful within
/// the owning stack; merged output concatenates rules across stacks in
/// (stack precedence, rule_order) order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AclRule {
    pub id: DbId,
    pub stack_id: DbId,
    pub rule_order: i32,
    pub action: String,
    pub protocol: Option<String>,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an ACL rule in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAclRule {
    pub rule_order: i32,
    pub action: String,
    pub protocol: Option<String>,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
}

/// DTO for updating an ACL rule. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAclRule {
    pub rule_order: Option<i32>,
    pub action: Option<String>,
    pub protocol: Option<String>,
    pub sources: Option<Vec<String>>,
    pub destinations: Option<Vec<String>>,
}
