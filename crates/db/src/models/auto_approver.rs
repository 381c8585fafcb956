use aclstack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Approver kind for a route CIDR.
pub const APPROVER_TYPE_ROUTES: &str = "routes";
/// Approver kind for exit-node advertisement.
pub const APPROVER_TYPE_EXIT_NODE: &str = "exitNode";

/// A row from the `auto_approvers` table.
///
/// For `approver_type = "routes"`, `match_expr` is the route CIDR the
/// approvers may self-approve. For `"exitNode"` the match is ignored: exit
/// node approval is a single global set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AutoApprover {
    pub id: DbId,
    pub stack_id: DbId,
    pub approver_type: String,
    pub match_expr: String,
    pub approvers: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an auto-approver in a stack.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAutoApprover {
    pub approver_type: String,
    pub match_expr: String,
    pub approvers: Vec<String>,
}

/// DTO for updating an auto-approver's approver list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAutoApprover {
    pub approvers: Option<Vec<String>>,
}
